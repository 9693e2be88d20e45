//! Export command - write the reconciled final data.

use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use concord::{exports_verbatim, ConcordError, Session};

use super::read_batch_blocking;

pub fn run(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    set: Vec<(String, String)>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = read_batch_blocking(&files)?;
    let mut session = Session::new();
    session.load_sources(batch.texts)?;

    for (feature, value) in set {
        if !exports_verbatim(&value) {
            eprintln!(
                "{} value for '{}' will not read back unchanged from the export",
                "Warning:".yellow(),
                feature
            );
        }
        session.set_final_value(&feature, value)?;
    }

    let csv = session.export_csv()?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(session.engine().export_file_name(Utc::now())));
    std::fs::write(&path, csv).map_err(|source| ConcordError::Io {
        path: path.clone(),
        source,
    })?;

    let worksheet = session.worksheet()?;
    let stats = &worksheet.run().stats;
    println!(
        "{} {} features to {}",
        "Exported".green().bold(),
        stats.total_features,
        path.display()
    );
    if verbose > 0 || worksheet.edited_count() > 0 {
        println!(
            "  {} auto-filled, {} edited, {} left empty",
            worksheet.run().rows.iter().filter(|r| r.auto_filled).count(),
            worksheet.edited_count(),
            worksheet.final_values().filter(|(_, v)| v.is_empty()).count()
        );
    }

    Ok(())
}
