pub mod convert;
pub mod html;
pub mod media;
pub mod records;
pub mod reformat;
pub mod resolve;
pub mod single;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pmc_markdown::{ArticleStore, ClientConfig, Pipeline};

/// Default output directory for cached pages and markdown
pub const DEFAULT_OUTPUT_DIR: &str = "data";

pub fn create_config(api_key: Option<&str>, email: Option<&str>, tool: &str) -> ClientConfig {
    let mut config = ClientConfig::new().with_tool(tool);

    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    if let Some(email) = email {
        config = config.with_email(email);
    }

    config
}

pub fn create_pipeline(
    api_key: Option<&str>,
    email: Option<&str>,
    tool: &str,
    output_dir: &Path,
    overwrite: bool,
) -> Pipeline {
    let config = create_config(api_key, email, tool);
    Pipeline::new(config, ArticleStore::new(output_dir)).with_overwrite(overwrite)
}

pub fn progress_bar(len: usize, unit: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{msg}})"
            ))
            .context("Failed to set progress bar style")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

pub fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set spinner style")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Ok(pb)
}
