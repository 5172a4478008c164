//! PMID → PMCID → HTML → markdown, with results kept on disk
//!
//! Items are processed one after another. Item-level failures (no PMCID, a
//! failed fetch) are logged and recorded in the [`BatchReport`]; only
//! filesystem errors abort a run.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::idconv::IdConverterClient;
use crate::pmc::{html_to_markdown, ArticleFetcher};
use crate::storage::ArticleStore;

/// One converted article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub pmid: Option<String>,
    pub pmcid: String,
    pub markdown: String,
    pub html_path: Option<PathBuf>,
    pub markdown_path: Option<PathBuf>,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// PMCIDs converted to markdown in this run
    pub converted: Vec<String>,
    /// PMIDs without a PMCID, malformed inputs included
    pub missing_pmcid: Vec<String>,
    /// PMCIDs whose page could not be fetched
    pub failed: Vec<String>,
    /// PMCIDs left alone because their markdown already existed
    pub skipped_existing: Vec<String>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.missing_pmcid.is_empty() && self.failed.is_empty()
    }
}

/// Resolver, fetcher and store wired together
///
/// The resolver and the fetcher share one rate limiter.
#[derive(Clone)]
pub struct Pipeline {
    resolver: IdConverterClient,
    fetcher: ArticleFetcher,
    store: ArticleStore,
    overwrite: bool,
}

impl Pipeline {
    pub fn new(config: ClientConfig, store: ArticleStore) -> Self {
        let rate_limiter = config.create_rate_limiter();
        Self {
            resolver: IdConverterClient::with_rate_limiter(config.clone(), rate_limiter.clone()),
            fetcher: ArticleFetcher::with_rate_limiter(config, rate_limiter),
            store,
            overwrite: false,
        }
    }

    /// Replace existing markdown instead of skipping it
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn resolver(&self) -> &IdConverterClient {
        &self.resolver
    }

    pub fn fetcher(&self) -> &ArticleFetcher {
        &self.fetcher
    }

    /// Resolve, fetch and convert one PMID without writing anything
    ///
    /// Returns `None` when the PMID has no PMCID or the page cannot be fetched.
    #[instrument(skip(self))]
    pub async fn preview_markdown(&self, pmid: &str) -> Result<Option<(Conversion, String)>> {
        let Some(pmcid) = self.resolver.lookup(pmid).await? else {
            warn!("No PMCID found for PMID {pmid}");
            return Ok(None);
        };
        info!("PMCID found for PMID {pmid}: {pmcid}");

        let html = match self.fetcher.fetch_html(&pmcid).await {
            Ok(html) => html,
            Err(e) if e.is_item_level() => {
                error!(%pmcid, error = %e, "No HTML found for PMCID");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let conversion = Conversion {
            pmid: Some(pmid.trim().to_string()),
            markdown: html_to_markdown(&html),
            pmcid,
            html_path: None,
            markdown_path: None,
        };

        Ok(Some((conversion, html)))
    }

    /// Resolve, fetch, convert and save one PMID
    pub async fn pmid_to_markdown(&self, pmid: &str) -> Result<Option<Conversion>> {
        let Some((mut conversion, html)) = self.preview_markdown(pmid).await? else {
            return Ok(None);
        };

        conversion.html_path = Some(self.store.save_html(&conversion.pmcid, &html)?);
        conversion.markdown_path =
            Some(self.store.save_markdown(&conversion.pmcid, &conversion.markdown)?);

        info!(pmcid = %conversion.pmcid, "Saved article markdown");
        Ok(Some(conversion))
    }

    /// Convert a list of PMIDs, reusing cached pages and existing markdown
    #[instrument(skip(self, pmids), fields(count = pmids.len()))]
    pub async fn pmids_to_markdown(&self, pmids: &[String]) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        info!("Getting PMCIDs for {} PMIDs", pmids.len());
        let mut seen = HashSet::new();
        let mut pmcids = Vec::new();
        for mapping in self.resolver.convert(pmids).await? {
            match mapping.pmcid {
                Some(pmcid) => {
                    if seen.insert(pmcid.clone()) {
                        pmcids.push(pmcid);
                    }
                }
                None => report.missing_pmcid.push(mapping.pmid),
            }
        }
        info!(
            "Found {} valid PMCIDs out of {} PMIDs",
            pmcids.len(),
            pmids.len()
        );

        let pending: Vec<String> = if self.overwrite {
            pmcids
        } else {
            let (existing, pending): (Vec<_>, Vec<_>) = pmcids
                .into_iter()
                .partition(|pmcid| self.store.has_markdown(pmcid));
            info!("Found {} existing markdown files", existing.len());
            report.skipped_existing = existing;
            pending
        };

        info!("Converting {} PMCIDs to Markdown", pending.len());
        for pmcid in pending {
            if !self.store.has_html(&pmcid) {
                match self.fetcher.fetch_html(&pmcid).await {
                    Ok(html) => {
                        self.store.save_html(&pmcid, &html)?;
                    }
                    Err(e) if e.is_item_level() => {
                        error!(%pmcid, error = %e, "No HTML found for PMCID");
                        report.failed.push(pmcid);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            self.convert_cached(&pmcid)?;
            report.converted.push(pmcid);
        }

        Ok(report)
    }

    /// Convert every cached page to markdown
    ///
    /// Pages that already have markdown are skipped unless overwriting.
    pub fn convert_local_html(&self) -> Result<BatchReport> {
        let html_dir = self.store.html_dir();
        if !html_dir.is_dir() {
            warn!("No HTML directory found at {}", html_dir.display());
            return Ok(BatchReport::default());
        }

        let mut report = BatchReport::default();
        for pmcid in self.store.existing_html_ids()? {
            if !self.overwrite && self.store.has_markdown(&pmcid) {
                report.skipped_existing.push(pmcid);
                continue;
            }
            self.convert_cached(&pmcid)?;
            report.converted.push(pmcid);
        }

        info!(
            converted = report.converted.len(),
            skipped = report.skipped_existing.len(),
            "Converted local HTML files"
        );
        Ok(report)
    }

    /// Convert the cached page of one PMCID
    pub fn convert_cached(&self, pmcid: &str) -> Result<Conversion> {
        self.convert_html_file(&self.store.html_path(pmcid))
    }

    /// Convert an HTML file, naming the markdown after the file stem
    pub fn convert_html_file(&self, path: &Path) -> Result<Conversion> {
        let html = fs::read_to_string(path)?;
        let pmcid = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let markdown = html_to_markdown(&html);
        let markdown_path = self.store.save_markdown(&pmcid, &markdown)?;

        Ok(Conversion {
            pmid: None,
            pmcid,
            markdown,
            html_path: Some(path.to_path_buf()),
            markdown_path: Some(markdown_path),
        })
    }
}

/// Read PMIDs from a text file, one per line, ignoring blank lines
pub fn read_pmid_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
