//! Serve command - host the reconciliation API.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use concord::Concord;

use super::read_batch;
use crate::server::{app, state::AppState};

pub fn run(files: Vec<PathBuf>, port: u16, _verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(files, port))
}

async fn serve(files: Vec<PathBuf>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(Arc::new(Concord::new()));

    if !files.is_empty() {
        let batch = read_batch(&files).await?;
        let table = state.load(batch.texts).await?;
        println!(
            "Loaded {} features from {} sources",
            table.total_rows,
            table.sources.len()
        );
    }

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting Concord API at".cyan().bold(),
        url.white().bold()
    );
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    app::run_server(state, port).await
}
