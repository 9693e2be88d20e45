//! Input decoding and source handling.

mod decoder;
mod reader;
mod source;

pub use decoder::{split_line, Decoder, DecoderConfig};
pub use reader::{read_sources, SourceBatch};
pub use source::{FeatureMap, Source, SourceMetadata, SourceText};
