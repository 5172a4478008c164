//! Client configuration shared by the ID converter and the article fetcher

use std::time::Duration;

use tracing::warn;

use crate::rate_limit::RateLimiter;

/// Default NCBI ID converter endpoint
pub const DEFAULT_IDCONV_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/idconv/v1.0/";

/// Default base for PMC article pages
pub const DEFAULT_ARTICLES_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles";

/// The ID converter rejects more than 200 ids per request
pub const MAX_BATCH_SIZE: usize = 200;

const DEFAULT_TOOL: &str = "pmc-markdown";

/// Article pages are served to browsers; a bare client string gets bounced
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Configuration for NCBI clients
///
/// # Example
///
/// ```
/// use pmc_markdown::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_email("researcher@university.edu")
///     .with_batch_size(50)
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.batch_size, 50);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Contact email sent with ID converter requests
    pub email: Option<String>,
    /// Tool name sent with ID converter requests
    pub tool: String,
    /// Optional NCBI API key
    pub api_key: Option<String>,
    /// ID converter endpoint
    pub idconv_base_url: String,
    /// Base URL for article pages (`<base>/<PMCID>/`)
    pub articles_base_url: String,
    /// PMIDs per ID converter request
    pub batch_size: usize,
    /// Requests per second across all clients built from this config
    pub rate_limit: Option<f64>,
    /// HTTP timeout
    pub timeout: Duration,
    /// User agent for every request
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            email: None,
            tool: DEFAULT_TOOL.to_string(),
            api_key: None,
            idconv_base_url: DEFAULT_IDCONV_URL.to_string(),
            articles_base_url: DEFAULT_ARTICLES_URL.to_string(),
            batch_size: 100,
            rate_limit: None,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_idconv_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.idconv_base_url = url.into();
        self
    }

    pub fn with_articles_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.articles_base_url = url.into();
        self
    }

    /// Point both endpoints at one origin, keeping the NCBI path layout
    ///
    /// Used to redirect the clients to a mock server.
    pub fn with_base_url<S: Into<String>>(mut self, origin: S) -> Self {
        let origin = origin.into();
        let origin = origin.trim_end_matches('/');
        self.idconv_base_url = format!("{origin}/pmc/utils/idconv/v1.0/");
        self.articles_base_url = format!("{origin}/pmc/articles");
        self
    }

    /// Set the batch size, clamped to `1..=200`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn with_rate_limit(mut self, rate: f64) -> Self {
        self.rate_limit = Some(rate);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Requests per second actually applied
    pub fn effective_rate_limit(&self) -> f64 {
        match (self.rate_limit, &self.api_key) {
            (Some(rate), _) => rate,
            (None, Some(_)) => 10.0,
            (None, None) => 2.5,
        }
    }

    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(BROWSER_USER_AGENT)
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }

    /// Identification parameters appended to ID converter requests
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("tool".to_string(), self.tool.clone())];

        match &self.email {
            Some(email) if !email.trim().is_empty() => {
                params.push(("email".to_string(), email.clone()));
            }
            _ => warn!("No email provided. Please set the NCBI_EMAIL environment variable."),
        }

        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
