use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pmc_markdown::format_academic_markdown;

#[derive(Args, Debug)]
pub struct Reformat {
    /// Markdown file produced by a crawler
    pub file: PathBuf,

    /// PMCID of the article, used for the metadata links
    #[arg(long)]
    pub pmcid: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Reformat {
    pub fn execute(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;

        let formatted = format_academic_markdown(&text, &self.pmcid);

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &formatted)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "Saved reformatted markdown");
            }
            None => print!("{formatted}"),
        }
        Ok(())
    }
}
