use anyhow::{Result, bail};
use clap::Args;
use pmc_markdown::{IdConverterClient, IdMapping};

use super::create_config;

#[derive(Args, Debug)]
pub struct Resolve {
    /// PMID(s) to resolve to PMCID
    #[arg(required = true)]
    pub pmids: Vec<String>,

    /// Output format (json, csv, or txt)
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Number of PMIDs per ID converter request (at most 200)
    #[arg(long, default_value = "100")]
    pub batch_size: usize,
}

impl Resolve {
    pub async fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        if !matches!(self.format.as_str(), "json" | "csv" | "txt") {
            bail!(
                "Unsupported format '{}'. Use 'json', 'csv', or 'txt'.",
                self.format
            );
        }

        let config = create_config(api_key, email, tool).with_batch_size(self.batch_size);
        let client = IdConverterClient::with_config(config);

        tracing::info!(
            total_pmids = self.pmids.len(),
            batch_size = self.batch_size,
            "Resolving PMIDs"
        );
        let mappings = client.convert(&self.pmids).await?;

        let found = mappings.iter().filter(|m| m.pmcid.is_some()).count();
        tracing::info!(found, total = mappings.len(), "Resolution finished");

        print!("{}", render(&mappings, &self.format)?);
        Ok(())
    }
}

fn render(mappings: &[IdMapping], format: &str) -> Result<String> {
    let output = match format {
        "json" => serde_json::to_string_pretty(mappings)? + "\n",
        "csv" => {
            let mut out = String::from("PMID,PMCID\n");
            for mapping in mappings {
                out.push_str(&format!(
                    "{},{}\n",
                    mapping.pmid,
                    mapping.pmcid.as_deref().unwrap_or("")
                ));
            }
            out
        }
        // Text format: only PMCIDs, one per line
        _ => mappings
            .iter()
            .filter_map(|mapping| mapping.pmcid.as_deref())
            .map(|pmcid| format!("{pmcid}\n"))
            .collect(),
    };
    Ok(output)
}
