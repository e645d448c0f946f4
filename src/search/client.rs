use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::request::{SearchOverrides, build_request_body};
use super::snippets::extract_snippets;
use super::types::{SearchResponse, SnippetResult};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http::HttpClient;
use crate::runtime::{RealRuntime, Runtime};

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the search API. Each call to [`SearchClient::run`] is
/// independent and owns its own backoff state.
pub struct SearchClient<R: Runtime = RealRuntime> {
    config: SearchConfig,
    http: HttpClient<R>,
}

impl<R: Runtime> Clone for SearchClient<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            http: self.http.clone(),
        }
    }
}

impl SearchClient<RealRuntime> {
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_runtime(config, RealRuntime)
    }
}

impl<R: Runtime> SearchClient<R> {
    pub fn with_runtime(config: SearchConfig, runtime: R) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!(
                "TLS certificate verification is disabled for {}",
                config.api_url
            );
        }

        let client = Client::builder()
            .user_agent(concat!("searchsnip/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| {
                SearchError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_http_client(config, client, runtime))
    }

    /// Uses a caller-supplied reqwest client; TLS and timeout settings in
    /// `config` are then the caller's responsibility.
    pub fn with_http_client(config: SearchConfig, client: Client, runtime: R) -> Self {
        let http = HttpClient::new(client, runtime, config.retry.clone());
        Self { config, http }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs `query` with the configured parameters.
    pub async fn run(&self, query: &str) -> Result<SnippetResult> {
        self.run_with(query, &SearchOverrides::default()).await
    }

    /// Runs `query`, replacing configured parameters with any set in `overrides`.
    #[tracing::instrument(skip(self, overrides))]
    pub async fn run_with(&self, query: &str, overrides: &SearchOverrides) -> Result<SnippetResult> {
        self.config.validate()?;
        if query.trim().is_empty() {
            return Err(SearchError::Configuration(
                "Search query must not be empty".to_string(),
            ));
        }

        let headers = self.headers()?;
        let body = build_request_body(&self.config, query, overrides);
        let url = self.config.endpoint_url();

        info!("Searching {} for {:?}", self.config.search_type, query);

        let response: SearchResponse = self.http.post_json(&url, &headers, &body).await?;

        let k = overrides.effective_k(&self.config);
        let result = extract_snippets(&response, self.config.search_type, k);

        debug!(
            "Extracted {} snippet(s), link: {:?}",
            result.snippets.len(),
            result.link
        );

        Ok(result)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut api_key = HeaderValue::from_str(self.config.api_key.expose()).map_err(|_| {
            SearchError::Configuration("API key contains invalid header characters".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        Ok(headers)
    }
}
