//! Raw-source reconstruction tests
//!
//! rebuild-raw is the designed inverse of ingestion: its output parses
//! back into the same blocks the records were written from.

use std::collections::BTreeMap;
use std::path::Path;

use tempfile::TempDir;

use mutun::error::MutunError;
use mutun::ingest::{parse_blocks, HeadingPrefixes, ItemManifest, Pipeline};
use mutun::library::{record_path, LanguageText};

fn manifest(name: &str) -> ItemManifest {
    ItemManifest {
        name: name.to_string(),
        category: "dhikr".to_string(),
        description: String::new(),
        languages: vec![
            "ar".to_string(),
            "transliteration".to_string(),
            "en".to_string(),
        ],
        title_translations: BTreeMap::new(),
        audio_id: None,
        item_type: None,
    }
}

fn pipeline(root: &Path) -> Pipeline {
    Pipeline::new(root, HeadingPrefixes::default())
}

#[test]
fn test_roundtrip_full_arity_distinct_lines() {
    let temp = TempDir::new().unwrap();
    let source = "alif\nbe\ncee\n\ndal\nhe\nef\n";
    let input = temp.path().join("raw.txt");
    std::fs::write(&input, source).unwrap();

    let pipeline = pipeline(temp.path());
    pipeline.ingest(&manifest("Round Trip"), &input, false).unwrap();

    let output = temp.path().join("rebuilt.txt");
    let blocks = pipeline.rebuild_raw("dhikr", "round-trip", &output).unwrap();
    assert_eq!(blocks, 2);

    let rebuilt = std::fs::read_to_string(&output).unwrap();
    assert_eq!(parse_blocks(&rebuilt), parse_blocks(source));
}

#[test]
fn test_roundtrip_collapses_headings() {
    let temp = TempDir::new().unwrap();
    let source = "Opening\n\na\nb\nc\n";
    let input = temp.path().join("raw.txt");
    std::fs::write(&input, source).unwrap();

    let pipeline = pipeline(temp.path());
    pipeline.ingest(&manifest("With Heading"), &input, false).unwrap();

    let output = temp.path().join("rebuilt.txt");
    pipeline.rebuild_raw("dhikr", "with-heading", &output).unwrap();

    let rebuilt = std::fs::read_to_string(&output).unwrap();
    // The replicated heading comes back as one marked line.
    assert_eq!(
        parse_blocks(&rebuilt),
        vec![
            vec!["INFO: Opening".to_string()],
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        ]
    );

    // Re-ingesting the rebuilt file reproduces the same records.
    let en_before =
        LanguageText::load(&record_path(temp.path(), "dhikr", "en", "with-heading")).unwrap();
    pipeline.ingest(&manifest("With Heading"), &output, false).unwrap();
    let en_after =
        LanguageText::load(&record_path(temp.path(), "dhikr", "en", "with-heading")).unwrap();
    assert_eq!(en_before, en_after);
}

#[test]
fn test_rebuild_unknown_id() {
    let temp = TempDir::new().unwrap();
    let err = pipeline(temp.path())
        .rebuild_raw("dhikr", "nope", &temp.path().join("out.txt"))
        .unwrap_err();
    assert!(matches!(err, MutunError::EntryNotFound { .. }));
}

#[test]
fn test_rebuild_missing_record_is_fatal() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("raw.txt");
    std::fs::write(&input, "a\nb\nc\n").unwrap();

    let pipeline = pipeline(temp.path());
    pipeline.ingest(&manifest("Incomplete"), &input, false).unwrap();

    std::fs::remove_file(record_path(temp.path(), "dhikr", "ar", "incomplete")).unwrap();

    let err = pipeline
        .rebuild_raw("dhikr", "incomplete", &temp.path().join("out.txt"))
        .unwrap_err();
    assert!(matches!(err, MutunError::MissingTextFile { .. }));
}

#[test]
fn test_rebuild_detects_length_mismatch() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("raw.txt");
    std::fs::write(&input, "a\nb\nc\n\nx\ny\nz\n").unwrap();

    let pipeline = pipeline(temp.path());
    pipeline.ingest(&manifest("Skewed"), &input, false).unwrap();

    // Truncate one language's record behind the catalog's back.
    let path = record_path(temp.path(), "dhikr", "en", "skewed");
    let mut record = LanguageText::load(&path).unwrap();
    record.text.pop();
    record.save(&path).unwrap();

    let err = pipeline
        .rebuild_raw("dhikr", "skewed", &temp.path().join("out.txt"))
        .unwrap_err();

    match err {
        MutunError::LineCountMismatch { id, counts } => {
            assert_eq!(id, "skewed");
            assert!(counts.contains(&("en".to_string(), 1)));
            assert!(counts.contains(&("ar".to_string(), 2)));
        }
        other => panic!("unexpected error: {other}"),
    }
}
