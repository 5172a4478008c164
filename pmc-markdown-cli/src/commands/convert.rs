use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use pmc_markdown::{BatchReport, read_pmid_file};

use super::{DEFAULT_OUTPUT_DIR, create_pipeline, spinner};

#[derive(Args, Debug)]
pub struct Convert {
    /// PMID(s) to convert
    pub pmids: Vec<String>,

    /// Text file with one PMID per line
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output directory (html/ and markdown/ are created inside)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Replace existing markdown files (default: skip them)
    #[arg(long)]
    pub overwrite: bool,

    /// Write the batch report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Convert {
    pub async fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let pmids = self.collect_pmids()?;
        if pmids.is_empty() {
            bail!("No PMIDs given. Pass them as arguments or with --file");
        }

        let pipeline = create_pipeline(api_key, email, tool, &self.output_dir, self.overwrite);

        let pb = spinner(format!("Converting {} PMIDs", pmids.len()))?;
        let report = pipeline.pmids_to_markdown(&pmids).await;
        pb.finish_and_clear();
        let report = report.context("Batch conversion failed")?;

        log_report(&report);

        if let Some(path) = &self.report {
            let json = serde_json::to_string_pretty(&report)?;
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Saved batch report");
        }

        Ok(())
    }

    fn collect_pmids(&self) -> Result<Vec<String>> {
        let mut pmids = self.pmids.clone();
        if let Some(file) = &self.file {
            let from_file = read_pmid_file(file)
                .with_context(|| format!("Failed to read PMID file {}", file.display()))?;
            tracing::info!(count = from_file.len(), "Read PMIDs from {}", file.display());
            pmids.extend(from_file);
        }
        Ok(pmids)
    }
}

fn log_report(report: &BatchReport) {
    tracing::info!(
        converted = report.converted.len(),
        skipped_existing = report.skipped_existing.len(),
        missing_pmcid = report.missing_pmcid.len(),
        failed = report.failed.len(),
        "Conversion finished"
    );

    if !report.missing_pmcid.is_empty() {
        tracing::warn!("PMIDs without PMCID: {}", report.missing_pmcid.join(", "));
    }
    if !report.failed.is_empty() {
        tracing::warn!("PMCIDs that could not be fetched: {}", report.failed.join(", "));
    }
}
