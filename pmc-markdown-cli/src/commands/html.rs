use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{DEFAULT_OUTPUT_DIR, create_pipeline, progress_bar};

#[derive(Args, Debug)]
pub struct Html {
    /// HTML files to convert (markdown is named after each file stem)
    #[arg(required_unless_present = "local", conflicts_with = "local")]
    pub files: Vec<PathBuf>,

    /// Convert every cached page under <output-dir>/html instead
    #[arg(long)]
    pub local: bool,

    /// Output directory (markdown/ is created inside)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Replace existing markdown files when converting cached pages
    #[arg(long)]
    pub overwrite: bool,
}

impl Html {
    pub fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let pipeline = create_pipeline(api_key, email, tool, &self.output_dir, self.overwrite);

        if self.local {
            let report = pipeline
                .convert_local_html()
                .context("Failed to convert cached HTML")?;
            tracing::info!(
                converted = report.converted.len(),
                skipped_existing = report.skipped_existing.len(),
                "Converted cached pages"
            );
            return Ok(());
        }

        let pb = progress_bar(self.files.len(), "files")?;
        pb.set_message("Converting HTML files");

        let mut failed = 0usize;
        for path in &self.files {
            pb.set_message(format!("Processing {}", path.display()));
            match pipeline.convert_html_file(path) {
                Ok(conversion) => {
                    if let Some(markdown_path) = &conversion.markdown_path {
                        tracing::debug!(path = %markdown_path.display(), "Saved markdown");
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(path = %path.display(), error = %e, "Failed to convert file");
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message(format!(
            "Converted {} of {} files",
            self.files.len() - failed,
            self.files.len()
        ));
        Ok(())
    }
}
