use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::common::PmcId;
use crate::config::ClientConfig;
use crate::error::{PmcError, Result};
use crate::rate_limit::RateLimiter;

/// What a browser sends when asking for an article page
const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches raw article pages from PubMed Central
///
/// Requests are never retried: a failed fetch is reported to the caller,
/// which decides whether to skip the article.
#[derive(Clone)]
pub struct ArticleFetcher {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl ArticleFetcher {
    /// Create a fetcher with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pmc_markdown::ArticleFetcher;
    ///
    /// let fetcher = ArticleFetcher::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a fetcher with its own rate limiter
    pub fn with_config(config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        Self::with_rate_limiter(config, rate_limiter)
    }

    /// Create a fetcher pacing its requests with an existing limiter
    ///
    /// Lets the fetcher and the ID converter share one request budget.
    pub fn with_rate_limiter(config: ClientConfig, rate_limiter: RateLimiter) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.articles_base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        }
    }

    /// Page URL for an article
    pub fn article_url(&self, pmcid: &PmcId) -> String {
        format!("{}/{pmcid}/?report=classic", self.base_url)
    }

    /// Fetch the classic-view HTML of an article
    ///
    /// # Arguments
    ///
    /// * `pmcid` - PMC ID with or without the `PMC` prefix
    ///
    /// # Errors
    ///
    /// * [`PmcError::InvalidPmcid`] for a malformed id
    /// * [`PmcError::ApiError`] for a non-success status
    /// * [`PmcError::EmptyResponse`] when the page has no content
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, pmcid: &str) -> Result<String> {
        let pmcid = PmcId::parse(pmcid)?;
        let url = self.article_url(&pmcid);

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

        let html = response.text().await?;
        if html.trim().is_empty() {
            return Err(PmcError::EmptyResponse {
                pmcid: pmcid.to_string(),
            });
        }

        debug!(%pmcid, bytes = html.len(), "Fetched article HTML");
        Ok(html)
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        self.rate_limiter.acquire().await;
        debug!("Making article request to: {url}");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HTML_ACCEPT)
            .send()
            .await?;

        Ok(response)
    }
}

impl Default for ArticleFetcher {
    fn default() -> Self {
        Self::new()
    }
}
