use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use super::{DEFAULT_OUTPUT_DIR, create_pipeline};

#[derive(Args, Debug)]
pub struct Single {
    /// PMID to convert
    pub pmid: String,

    /// Output directory (html/ and markdown/ are created inside)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Print the markdown without saving anything
    #[arg(long)]
    pub no_save: bool,
}

impl Single {
    pub async fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let pipeline = create_pipeline(api_key, email, tool, &self.output_dir, true);

        let conversion = if self.no_save {
            pipeline
                .preview_markdown(&self.pmid)
                .await?
                .map(|(conversion, _)| conversion)
        } else {
            pipeline.pmid_to_markdown(&self.pmid).await?
        };

        let Some(conversion) = conversion else {
            bail!("No markdown could be produced for PMID {}", self.pmid);
        };

        if let Some(path) = &conversion.markdown_path {
            tracing::info!(pmcid = %conversion.pmcid, path = %path.display(), "Saved markdown");
        }
        println!("{}", conversion.markdown);

        Ok(())
    }
}
