use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pmc_markdown::{ArticleStore, RecordMap};

use super::DEFAULT_OUTPUT_DIR;

#[derive(Args, Debug)]
pub struct Records {
    /// Output directory holding markdown/
    #[arg(short = 'd', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub data_dir: PathBuf,

    /// CSV path (default: <data-dir>/record_map.csv)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Records {
    pub fn execute(&self) -> Result<()> {
        let store = ArticleStore::new(&self.data_dir);
        let record_map = RecordMap::build(store.markdown_dir())
            .with_context(|| format!("Failed to scan {}", store.markdown_dir().display()))?;

        let missing = record_map.missing();

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.data_dir.join("record_map.csv"));
        record_map
            .write_csv(&output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        tracing::info!(
            records = record_map.len(),
            incomplete = missing.len(),
            path = %output.display(),
            "Record map written"
        );
        Ok(())
    }
}
