//! Ledger of converted articles, rebuilt from the markdown files themselves
//!
//! Every markdown file carries its identifiers in the metadata block, so the
//! ledger never drifts from what is actually on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::files_with_extension;

/// Identifiers found in the metadata block of a markdown file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMetadata {
    pub pmid: Option<String>,
    pub pmcid: Option<String>,
    pub url: Option<String>,
}

/// `**PMID:** <value>`; group 1 is the value
fn pmid_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*PMID:\*\*\s*([^\n]+)").expect("Failed to compile PMID field regex"))
}

/// `**PMCID:** <value>`; group 1 is the value
fn pmcid_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*PMCID:\*\*\s*([^\n]+)").expect("Failed to compile PMCID field regex")
    })
}

/// `**URL:** <value>`; group 1 is the value
fn url_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*URL:\*\*\s*([^\n]+)").expect("Failed to compile URL field regex"))
}

/// Extract PMID, PMCID and URL from a converted article
///
/// # Example
///
/// ```
/// use pmc_markdown::records::parse_markdown_metadata;
///
/// let metadata = parse_markdown_metadata("## Metadata\n\n**PMCID:** PMC1\n\n**PMID:** 2\n");
/// assert_eq!(metadata.pmcid.as_deref(), Some("PMC1"));
/// assert_eq!(metadata.pmid.as_deref(), Some("2"));
/// assert_eq!(metadata.url, None);
/// ```
pub fn parse_markdown_metadata(markdown: &str) -> RecordMetadata {
    let capture = |pattern: &Regex| {
        pattern
            .captures(markdown)
            .map(|caps| caps[1].trim().to_string())
            .filter(|value| !value.is_empty())
    };

    RecordMetadata {
        pmid: capture(pmid_field()),
        pmcid: capture(pmcid_field()),
        url: capture(url_field()),
    }
}

/// One row of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "PMID")]
    pub pmid: Option<String>,
    #[serde(rename = "PMCID")]
    pub pmcid: Option<String>,
    #[serde(rename = "URL")]
    pub url: Option<String>,
    pub markdown_path: PathBuf,
}

impl Record {
    /// Names of the identifier columns left empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("PMID", &self.pmid),
            ("PMCID", &self.pmcid),
            ("URL", &self.url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// All ledger rows, ordered by markdown path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMap {
    pub records: Vec<Record>,
}

impl RecordMap {
    /// Scan every `.md` file in `markdown_dir`
    pub fn build<P: AsRef<Path>>(markdown_dir: P) -> Result<Self> {
        let mut records = Vec::new();
        for path in files_with_extension(markdown_dir.as_ref(), "md")? {
            let metadata = parse_markdown_metadata(&fs::read_to_string(&path)?);
            records.push(Record {
                pmid: metadata.pmid,
                pmcid: metadata.pmcid,
                url: metadata.url,
                markdown_path: path,
            });
        }

        info!(records = records.len(), "Finished processing records");
        Ok(Self { records })
    }

    /// Records lacking PMID, PMCID or URL, with the names of the missing fields
    pub fn missing(&self) -> Vec<(&Record, Vec<&'static str>)> {
        let missing: Vec<_> = self
            .records
            .iter()
            .map(|record| (record, record.missing_fields()))
            .filter(|(_, fields)| !fields.is_empty())
            .collect();

        if !missing.is_empty() {
            warn!("Found {} records with missing fields", missing.len());
            for (record, fields) in &missing {
                warn!(
                    "Record {} is missing: {}",
                    record.markdown_path.display(),
                    fields.join(", ")
                );
            }
        }

        missing
    }

    /// Known PMIDs, in ledger order
    pub fn pmids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.pmid.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the ledger as `PMID,PMCID,URL,markdown_path`
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("Record map saved to {}", path.display());
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Record>, csv::Error>>()?;
        Ok(Self { records })
    }
}
