use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pmc_markdown::extract_media;

#[derive(Args, Debug)]
pub struct Media {
    /// HTML file to inspect
    pub file: PathBuf,
}

impl Media {
    pub fn execute(&self) -> Result<()> {
        let html = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let inventory = extract_media(&html);
        tracing::info!(
            tables = inventory.tables.len(),
            images = inventory.images.len(),
            "Extracted media"
        );

        println!("{}", serde_json::to_string_pretty(&inventory)?);
        Ok(())
    }
}
