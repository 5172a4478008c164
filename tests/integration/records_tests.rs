//! Record map built from converted markdown files

mod common;

use std::fs;

use common::read_fixture;
use pmc_markdown::{ArticleStore, Record, RecordMap, html_to_markdown, parse_markdown_metadata};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tracing_test::traced_test;

#[test]
fn test_metadata_block_of_converted_article() {
    let markdown = html_to_markdown(&read_fixture("PMC7906746.html"));
    let metadata = parse_markdown_metadata(&markdown);

    assert_eq!(metadata.pmcid.as_deref(), Some("PMC7906746"));
    assert_eq!(metadata.pmid.as_deref(), Some("33594324"));
    assert_eq!(
        metadata.url.as_deref(),
        Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7906746/")
    );
}

#[test]
#[traced_test]
fn test_build_flags_incomplete_records() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArticleStore::new(temp_dir.path());

    store
        .save_markdown("PMC7906746", &html_to_markdown(&read_fixture("PMC7906746.html")))
        .unwrap();
    store
        .save_markdown("PMC2", "# Stub\n\n## Metadata\n\n**PMCID:** PMC2\n\n")
        .unwrap();
    fs::write(store.markdown_dir().join("README.txt"), "not a record").unwrap();

    let record_map = RecordMap::build(store.markdown_dir()).unwrap();
    assert_eq!(record_map.len(), 2);
    assert_eq!(record_map.pmids(), vec!["33594324"]);

    let missing = record_map.missing();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].0.pmcid.as_deref(), Some("PMC2"));
    assert_eq!(missing[0].1, vec!["PMID", "URL"]);

    assert!(logs_contain("Found 1 records with missing fields"));
    assert!(logs_contain("is missing: PMID, URL"));
}

#[test]
fn test_build_on_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let record_map = RecordMap::build(temp_dir.path().join("markdown")).unwrap();

    assert!(record_map.is_empty());
    assert!(record_map.missing().is_empty());
}

#[test]
fn test_csv_round_trip_through_nested_path() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArticleStore::new(temp_dir.path());
    store
        .save_markdown("PMC7906746", &html_to_markdown(&read_fixture("PMC7906746.html")))
        .unwrap();

    let record_map = RecordMap::build(store.markdown_dir()).unwrap();
    let csv_path = temp_dir.path().join("reports/record_map.csv");
    record_map.write_csv(&csv_path).unwrap();

    let loaded = RecordMap::read_csv(&csv_path).unwrap();
    assert_eq!(
        loaded.records,
        vec![Record {
            pmid: Some("33594324".into()),
            pmcid: Some("PMC7906746".into()),
            url: Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7906746/".into()),
            markdown_path: store.markdown_path("PMC7906746"),
        }]
    );
}
