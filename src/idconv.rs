//! PMID to PMCID resolution through the NCBI ID converter
//!
//! Ids are sent in batches (at most 200 per request). A batch that fails as a
//! whole is logged and every PMID in it resolves to `None`, so one bad
//! request never aborts a long run.

use std::collections::HashMap;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::common::PubMedId;
use crate::config::ClientConfig;
use crate::error::{PmcError, Result};
use crate::rate_limit::RateLimiter;

/// Resolution result for one requested PMID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdMapping {
    pub pmid: String,
    pub pmcid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdConvResponse {
    #[serde(default)]
    records: Vec<IdConvRecord>,
}

#[derive(Debug, Deserialize)]
struct IdConvRecord {
    #[serde(default)]
    pmid: Option<IdValue>,
    #[serde(default)]
    pmcid: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "requested-id", default)]
    requested_id: Option<IdValue>,
}

/// The service returns ids as strings or bare numbers depending on the record
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(text) => text.trim().to_string(),
            IdValue::Number(number) => number.to_string(),
        }
    }
}

impl IdConvRecord {
    /// PMID this record answers for, and its PMCID if one is available
    fn into_pair(self) -> Option<(String, Option<String>)> {
        let pmid = self.pmid.or(self.requested_id)?.into_string();
        let failed = self
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("error"));

        let pmcid = self
            .pmcid
            .map(|pmcid| pmcid.trim().to_string())
            .filter(|pmcid| !failed && !pmcid.is_empty());

        Some((pmid, pmcid))
    }
}

/// Client for the NCBI PMC ID converter
#[derive(Clone)]
pub struct IdConverterClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl IdConverterClient {
    /// Create a client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_markdown::IdConverterClient;
    ///
    /// let client = IdConverterClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with its own rate limiter
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_markdown::{ClientConfig, IdConverterClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_batch_size(50);
    ///
    /// let client = IdConverterClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        Self::with_rate_limiter(config, rate_limiter)
    }

    /// Create a client pacing its requests with an existing limiter
    pub fn with_rate_limiter(config: ClientConfig, rate_limiter: RateLimiter) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.idconv_base_url.clone(),
            rate_limiter,
            config,
        }
    }

    /// Resolve PMIDs to PMCIDs
    ///
    /// The result holds one entry per requested PMID, in input order. Inputs
    /// that are not valid PMIDs are never sent and map to `None`, keyed by
    /// their trimmed text.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pmc_markdown::IdConverterClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = IdConverterClient::new();
    ///     let pmids = vec!["31978945".to_string(), "33594324".to_string()];
    ///     for mapping in client.convert(&pmids).await? {
    ///         println!("{} -> {:?}", mapping.pmid, mapping.pmcid);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, pmids), fields(count = pmids.len()))]
    pub async fn convert(&self, pmids: &[String]) -> Result<Vec<IdMapping>> {
        let parsed: Vec<Option<String>> = pmids
            .iter()
            .map(|pmid| match PubMedId::parse(pmid) {
                Ok(id) => Some(id.to_string()),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid PMID {:?}", pmid.trim());
                    None
                }
            })
            .collect();
        let valid: Vec<String> = parsed.iter().flatten().cloned().collect();

        let mut resolved = HashMap::new();

        for (batch_index, batch) in valid.chunks(self.config.batch_size).enumerate() {
            let start = batch_index * self.config.batch_size;
            info!(
                batch_index,
                "Processing PMIDs {} to {}",
                start + 1,
                start + batch.len()
            );

            match self.convert_batch(batch).await {
                Ok(batch_resolved) => resolved.extend(batch_resolved),
                Err(e) => {
                    error!(batch_index, error = %e, "Failed ID converter batch starting at index {start}");
                }
            }
        }

        let mappings = pmids
            .iter()
            .zip(parsed)
            .map(|(raw, pmid)| match pmid {
                Some(pmid) => {
                    let pmcid = resolved.get(&pmid).cloned().flatten();
                    match &pmcid {
                        Some(pmcid) => debug!("PMID {pmid} -> PMCID {pmcid}"),
                        None => warn!("PMID {pmid} has no PMCID available"),
                    }
                    IdMapping { pmid, pmcid }
                }
                None => IdMapping {
                    pmid: raw.trim().to_string(),
                    pmcid: None,
                },
            })
            .collect();

        Ok(mappings)
    }

    /// Resolve a single PMID
    ///
    /// # Errors
    ///
    /// * [`PmcError::InvalidPmid`] if `pmid` is not a valid PMID
    pub async fn lookup(&self, pmid: &str) -> Result<Option<String>> {
        let pmid = PubMedId::parse(pmid)?;
        let mappings = self.convert(&[pmid.to_string()]).await?;
        Ok(mappings.into_iter().next().and_then(|mapping| mapping.pmcid))
    }

    async fn convert_batch(&self, batch: &[String]) -> Result<HashMap<String, Option<String>>> {
        let mut url = format!(
            "{}?ids={}&format=json",
            self.base_url,
            urlencoding::encode(&batch.join(","))
        );

        for (key, value) in self.config.build_api_params() {
            url.push('&');
            url.push_str(&key);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }

        let response = self.make_request(&url).await?;

        if !response.status().is_success() {
            return Err(PmcError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: IdConvResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .records
            .into_iter()
            .filter_map(IdConvRecord::into_pair)
            .collect())
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        self.rate_limiter.acquire().await;
        debug!("Making ID converter request to: {url}");
        let response = self.client.get(url).send().await?;
        Ok(response)
    }
}

impl Default for IdConverterClient {
    fn default() -> Self {
        Self::new()
    }
}
