//! Integration tests for Concord.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use concord::{
    read_sources, AgreementClass, CellTag, Concord, ConcordError, Decoder, FillTag, Session,
    SourceBatch, SourceText,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn texts(contents: &[&str]) -> Vec<SourceText> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| SourceText::new(format!("file{}.csv", i + 1), *c))
        .collect()
}

// =============================================================================
// Reading Sources
// =============================================================================

#[tokio::test]
async fn test_read_sources_from_files() {
    let files = [
        create_test_file("Feature,Data\ncolor,red\n"),
        create_test_file("Feature,Data\ncolor,red\n"),
        create_test_file("Feature,Data\ncolor,blue\n"),
    ];
    let paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();

    let results = read_sources(&paths).await;
    let batch = SourceBatch::from_results(results).expect("batch");

    assert_eq!(batch.texts.len(), 3);
    assert!(!batch.has_optional());
    assert_eq!(batch.texts[2].text, "Feature,Data\ncolor,blue\n");
}

#[tokio::test]
async fn test_missing_optional_source_is_dropped() {
    let files = [
        create_test_file("Feature,Data\nk,1\n"),
        create_test_file("Feature,Data\nk,1\n"),
        create_test_file("Feature,Data\nk,1\n"),
    ];
    let mut paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
    paths.push(PathBuf::from("/nonexistent/concord/fourth.csv"));

    let batch = SourceBatch::from_results(read_sources(&paths).await).expect("batch");

    assert_eq!(batch.texts.len(), 3);
    assert!(matches!(
        batch.dropped.as_slice(),
        [ConcordError::SourceRead { slot: 4, .. }]
    ));

    let mut session = Session::new();
    let worksheet = session.load_sources(batch.texts).unwrap();
    assert_eq!(worksheet.run().row("k").unwrap().values.len(), 3);
    assert_eq!(worksheet.run().row("k").unwrap().class, AgreementClass::Same);
}

#[tokio::test]
async fn test_missing_required_source_fails() {
    let a = create_test_file("Feature,Data\nk,1\n");
    let c = create_test_file("Feature,Data\nk,1\n");
    let paths = vec![
        a.path().to_path_buf(),
        PathBuf::from("/nonexistent/concord/second.csv"),
        c.path().to_path_buf(),
    ];

    let err = SourceBatch::from_results(read_sources(&paths).await).unwrap_err();
    assert!(matches!(
        err,
        ConcordError::InsufficientSources {
            required: 3,
            provided: 2,
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.contains("second.csv"));
    assert!(message.contains("source 2"));
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let mut bad = NamedTempFile::new().unwrap();
    bad.write_all(b"Feature,Data\nname,caf\xff\n").unwrap();
    let good = create_test_file("Feature,Data\nname,cafe\n");
    let other = create_test_file("Feature,Data\nname,cafe\n");
    let paths = vec![
        bad.path().to_path_buf(),
        good.path().to_path_buf(),
        other.path().to_path_buf(),
    ];

    let batch = SourceBatch::from_results(read_sources(&paths).await).unwrap();
    let source = Decoder::new().decode_source(1, &batch.texts[0]);
    assert_eq!(source.value("name"), "caf\u{FFFD}");
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn test_reconcile_end_to_end() {
    let mut session = Session::new();
    let worksheet = session
        .load_sources(texts(&[
            "Feature,Data\nA,1\nB,2\nC,x",
            "Feature,Data\nA,1\nB,3\nC,y",
            "Feature,Data\nA,1\nC,x",
        ]))
        .unwrap();
    let run = worksheet.run();

    assert_eq!(run.stats.total_features, 3);
    assert_eq!(run.stats.same, 1);
    assert_eq!(run.stats.partial, 1);
    assert_eq!(run.stats.different, 1);
    assert_eq!(run.stats.missing_cells, 1);

    let file2 = run.stats.slot_diff(2).unwrap();
    assert_eq!((file2.compared, file2.differing), (3, 2));
    assert_eq!(file2.percent_label(), "66.7%");

    assert_eq!(worksheet.final_value("A"), Some("1"));
    assert_eq!(worksheet.final_value("B"), Some(""));
    assert_eq!(worksheet.final_value("C"), Some("x"));

    let rows = worksheet.render();
    assert_eq!(rows[1].cells[2].tag, CellTag::Blue);
    assert_eq!(rows[2].fill, FillTag::Yellow);
}

#[test]
fn test_quoted_values_reconcile_equal() {
    let mut session = Session::new();
    let worksheet = session
        .load_sources(texts(&[
            "Feature,Data\n\"address\",\"1 Main St, Springfield\"",
            "Feature,Data\naddress,\"1 Main St, Springfield\"",
            "Feature,Data\naddress , \"1 Main St, Springfield\"",
        ]))
        .unwrap();

    let row = worksheet.run().row("address").unwrap();
    assert_eq!(row.class, AgreementClass::Same);
    assert_eq!(row.recommended, "1 Main St, Springfield");
}

#[test]
fn test_fourth_source_changes_layout() {
    let concord = Concord::new();
    let run = concord
        .reconcile(&texts(&[
            "h\nk,a",
            "h\nk,b",
            "h\nk,a",
            "h\nk,b",
        ]))
        .unwrap();

    let k = run.row("k").unwrap();
    assert_eq!(k.class, AgreementClass::Partial);
    assert_eq!(k.recommended, "a");
    assert_eq!(run.stats.slot_diffs.len(), 3);
    assert_eq!(run.stats.slot_diff(4).unwrap().percent, 100.0);
}

#[test]
fn test_rerun_is_idempotent() {
    let inputs = texts(&[
        "Feature,Data\na,1\nb,\nc,3",
        "Feature,Data\na,1\nb,2",
        "Feature,Data\na,2\nc,3\nd,4",
    ]);
    let concord = Concord::new();
    let first = concord.reconcile(&inputs).unwrap();
    let second = concord.reconcile(&inputs).unwrap();

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.stats, second.stats);
    assert_ne!(first.generation, second.generation);
}

// =============================================================================
// Review and Export
// =============================================================================

#[test]
fn test_override_and_export_round_trip() {
    let mut session = Session::new();
    session
        .load_sources(texts(&[
            "Feature,Data\nheight,10\nwidth,4",
            "Feature,Data\nheight,11\nwidth,4",
            "Feature,Data\nheight,12\nwidth,5",
        ]))
        .unwrap();

    session.set_final_value("height", "11").unwrap();
    let exported = session.export_csv().unwrap();
    assert_eq!(
        exported,
        "Feature,Final Data\n\"height\",\"11\"\n\"width\",\"4\"\n"
    );

    let decoded = Decoder::new().decode(&exported);
    assert_eq!(decoded.get("height").map(String::as_str), Some("11"));
    assert_eq!(decoded.get("width").map(String::as_str), Some("4"));

    assert!(matches!(
        session.set_final_value("depth", "1"),
        Err(ConcordError::UnknownFeature(_))
    ));
}

#[test]
fn test_export_file_is_written() {
    let mut session = Session::new();
    session
        .load_sources(texts(&["h\nk,v", "h\nk,v", "h\nk,v"]))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let name = session.engine().export_file_name(chrono::Utc::now());
    let path = dir.path().join(&name);
    std::fs::write(&path, session.export_csv().unwrap()).unwrap();

    assert!(name.starts_with("final_data_"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Feature,Final Data\n"));
}

#[test]
fn test_filter_after_load() {
    let mut session = Session::new();
    let worksheet = session
        .load_sources(texts(&[
            "h\nHeight,1\nWidth,2\nweight,3",
            "h\nHeight,1",
            "h\nHeight,1",
        ]))
        .unwrap();

    assert_eq!(worksheet.visible_features("EIGHT"), vec!["Height", "weight"]);
    assert_eq!(session.filter("").unwrap(), vec![true, true, true]);
}
