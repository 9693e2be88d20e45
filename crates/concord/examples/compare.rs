//! Example: Compare three or four CSV sources with Concord.
//!
//! Usage:
//!   cargo run --example compare -- <file1> <file2> <file3> [file4]

use std::env;
use std::path::PathBuf;

use concord::{read_sources, Session, SourceBatch};

#[tokio::main]
async fn main() -> concord::Result<()> {
    let paths: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();

    if paths.len() < 3 {
        eprintln!("Usage: cargo run --example compare -- <file1> <file2> <file3> [file4]");
        std::process::exit(1);
    }

    let batch = SourceBatch::from_results(read_sources(&paths).await)?;
    for dropped in &batch.dropped {
        eprintln!("Warning: {}", dropped);
    }

    let mut session = Session::new();
    let worksheet = session.load_sources(batch.texts)?;
    let run = worksheet.run();

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Concord Comparison ({} sources)", run.sources.len());
    println!("{}", separator);
    println!();

    for source in &run.sources {
        println!(
            "  [{}] {:30} features={:<6} skipped={}",
            source.slot, source.name, source.feature_count, source.skipped_lines
        );
    }
    println!();

    for row in &run.rows {
        println!(
            "  {:24} {:10} {:?} -> {:?}",
            row.feature,
            row.class.label(),
            row.values,
            row.recommended
        );
    }
    println!();

    let stats = &run.stats;
    println!("## Summary");
    println!("  Total:     {}", stats.total_features);
    println!("  Same:      {}", stats.same);
    println!("  Partial:   {}", stats.partial);
    println!("  Different: {}", stats.different);
    println!("  Missing:   {}", stats.missing_cells);
    for diff in &stats.slot_diffs {
        println!("  {}: {}", diff.name(), diff.percent_label());
    }

    Ok(())
}
