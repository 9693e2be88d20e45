//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use concord::{Concord, Session, SourceText};

use super::handlers::TableResponse;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Engine producing runs; shared with the session.
    pub engine: Arc<Concord>,
    /// The session being reviewed.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new application state with no sources loaded.
    pub fn new(engine: Arc<Concord>) -> Self {
        let session = Session::with_engine(Arc::clone(&engine));
        Self {
            engine,
            session: Arc::new(RwLock::new(session)),
        }
    }

    /// Reconcile `texts` and install the run.
    ///
    /// The lock is only taken to install, so requests keep being served while
    /// a run is classified. When two loads overlap, the run started last wins.
    pub async fn load(&self, texts: Vec<SourceText>) -> concord::Result<TableResponse> {
        let run = self.engine.reconcile(&texts)?;

        let mut session = self.session.write().await;
        let worksheet = session.install(run)?;
        Ok(TableResponse::new(worksheet, ""))
    }
}
