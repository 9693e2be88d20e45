//! Compare command - classify every feature and print the result.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use concord::{
    AgreementClass, CellTag, ClassifierConfig, Concord, ConcordConfig, ConcordError, RenderRow,
    Session, Worksheet,
};
use serde::Serialize;

use super::read_batch_blocking;
use crate::cli::OutputFormat;

/// Widest a table column may grow before values are truncated.
const MAX_COLUMN_WIDTH: usize = 24;

#[derive(Serialize)]
struct CompareOutput<'a> {
    generation: u64,
    sources: &'a [concord::SourceMetadata],
    stats: &'a concord::AggregateStats,
    rows: Vec<RenderRow>,
}

pub fn run(
    files: Vec<PathBuf>,
    format: OutputFormat,
    filter: Option<String>,
    output: Option<PathBuf>,
    all_missing: bool,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConcordConfig {
        classifier: ClassifierConfig {
            all_missing_class: all_missing,
        },
        ..ConcordConfig::default()
    };

    let batch = read_batch_blocking(&files)?;
    let mut session = Session::with_engine(Concord::with_config(config).into());
    let worksheet = session.load_sources(batch.texts)?;
    let query = filter.as_deref().unwrap_or("");

    match format {
        OutputFormat::Table => {
            print_table(worksheet, query, verbose > 0);
            if let Some(path) = output {
                write_report(worksheet, &path)?;
                println!("Wrote report to {}", path.display());
            }
        }
        OutputFormat::Json => {
            let run = worksheet.run();
            let body = CompareOutput {
                generation: run.generation,
                sources: &run.sources,
                stats: &run.stats,
                rows: visible_rows(worksheet, query),
            };
            let json = serde_json::to_string_pretty(&body)?;
            match output {
                Some(path) => write_file(&path, json.as_bytes())?,
                None => println!("{}", json),
            }
        }
        OutputFormat::Csv => match output {
            Some(path) => write_report(worksheet, &path)?,
            None => worksheet.write_report(io::stdout().lock())?,
        },
    }

    Ok(())
}

fn visible_rows(worksheet: &Worksheet, query: &str) -> Vec<RenderRow> {
    let visible = concord::filter_features(
        worksheet.run().rows.iter().map(|r| r.feature.as_str()),
        query,
    );
    worksheet
        .render()
        .into_iter()
        .zip(visible)
        .filter_map(|(row, show)| show.then_some(row))
        .collect()
}

fn print_table(worksheet: &Worksheet, query: &str, show_sources: bool) {
    let run = worksheet.run();
    let rows = visible_rows(worksheet, query);

    println!(
        "{} {}",
        "Comparing".cyan().bold(),
        run.source_names().join(", ").white()
    );
    if show_sources {
        for source in &run.sources {
            println!(
                "  [{}] {} ({} features, {} skipped lines, {})",
                source.slot,
                source.name,
                source.feature_count,
                source.skipped_lines,
                source.hash
            );
        }
    }
    println!();

    let mut headers = vec!["Feature".to_string()];
    headers.extend(run.source_names().iter().map(|s| s.to_string()));
    headers.push("Final Data".to_string());

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        let cells = std::iter::once(&row.feature)
            .chain(row.cells.iter().map(|c| &c.value))
            .chain(std::iter::once(&row.final_value));
        for (width, text) in widths.iter_mut().zip(cells) {
            *width = (*width).max(text.chars().count());
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in &rows {
        let last = widths.len() - 1;
        let mut line = vec![pad(&row.feature, widths[0]).normal()];
        for (cell, width) in row.cells.iter().zip(&widths[1..last]) {
            line.push(paint(&pad(display_value(&cell.value), *width), cell.tag));
        }
        let final_text = pad(&row.final_value, widths[last]);
        line.push(if row.edited {
            final_text.bold()
        } else {
            paint(&final_text, fill_color(row))
        });

        let line: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        println!("{}", line.join("  "));
    }

    if rows.len() < run.rows.len() {
        println!(
            "{}",
            format!("({} of {} features shown)", rows.len(), run.rows.len()).dimmed()
        );
    }
    println!();
    print_summary(worksheet);
}

fn print_summary(worksheet: &Worksheet) {
    let stats = &worksheet.run().stats;

    println!("{}", "Summary:".yellow().bold());
    println!("  Total:     {}", stats.total_features.to_string().white().bold());
    println!("  Same:      {}", stats.same.to_string().green());
    println!("  Partial:   {}", stats.partial.to_string().yellow());
    println!("  Different: {}", stats.different.to_string().red());
    if stats.all_missing > 0 {
        println!(
            "  {}: {}",
            AgreementClass::AllMissing.label(),
            stats.all_missing.to_string().blue()
        );
    }
    println!("  Missing:   {}", stats.missing_cells.to_string().blue());
    for diff in &stats.slot_diffs {
        println!("  {}: {}", diff.name(), diff.percent_label());
    }
}

fn fill_color(row: &RenderRow) -> CellTag {
    match row.fill {
        concord::FillTag::Green => CellTag::Green,
        concord::FillTag::Yellow => CellTag::Yellow,
        concord::FillTag::Unfilled => CellTag::Blue,
    }
}

fn paint(text: &str, tag: CellTag) -> ColoredString {
    match tag {
        CellTag::Green => text.green(),
        CellTag::Yellow => text.yellow(),
        CellTag::Red => text.red(),
        CellTag::Blue => text.blue(),
    }
}

fn display_value(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Pad or truncate to exactly `width` characters.
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn write_report(worksheet: &Worksheet, path: &Path) -> concord::Result<()> {
    let file = File::create(path).map_err(|source| ConcordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    worksheet.write_report(file)
}

fn write_file(path: &Path, bytes: &[u8]) -> concord::Result<()> {
    File::create(path)
        .and_then(|mut f| f.write_all(bytes))
        .map_err(|source| ConcordError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abc…");
        assert_eq!(pad("", 0), "");
    }

    #[test]
    fn test_visible_rows_filter() {
        let mut session = Session::new();
        let worksheet = session
            .load_sources(vec![
                concord::SourceText::new("a", "h\nHeight,1\nWidth,2"),
                concord::SourceText::new("b", "h\nHeight,1\nWidth,2"),
                concord::SourceText::new("c", "h\nHeight,1\nWidth,3"),
            ])
            .unwrap();

        let rows = visible_rows(worksheet, "wid");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].feature, "Width");
        assert_eq!(rows[0].final_value, "2");
        assert_eq!(visible_rows(worksheet, "").len(), 2);
    }
}
