//! API request handlers.

mod export;
mod sources;
mod table;

pub use export::*;
pub use sources::*;
pub use table::*;
