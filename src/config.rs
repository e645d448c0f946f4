//! Search client configuration.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::http::RetryPolicy;
use crate::runtime::Runtime;

pub const DEFAULT_API_URL: &str = "https://google.serper.dev";
pub const API_KEY_ENV: &str = "SERPER_API_KEY";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result category; selects both the endpoint and the response list to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// General web search
    #[default]
    Search,
    News,
    Places,
    Images,
}

impl SearchType {
    /// Path segment of the endpoint for this category.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchType::Search => "search",
            SearchType::News => "news",
            SearchType::Places => "places",
            SearchType::Images => "images",
        }
    }

    /// Key of the result list in the response body.
    pub fn result_key(&self) -> &'static str {
        match self {
            SearchType::Search => "organic",
            SearchType::News => "news",
            SearchType::Places => "places",
            SearchType::Images => "images",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for SearchType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "search" | "web" => Ok(SearchType::Search),
            "news" => Ok(SearchType::News),
            "places" => Ok(SearchType::Places),
            "images" => Ok(SearchType::Images),
            _ => anyhow::bail!(
                "Unknown search type: {}. Expected search, news, places, or images.",
                s
            ),
        }
    }
}

/// API credential. Never printed in full.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First and last few characters, for diagnostics.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < 12 {
            return "*********".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}*********{}", head, tail)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Immutable configuration held by a [`crate::search::SearchClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub api_key: ApiKey,
    /// Region code, e.g. `us`
    pub gl: String,
    /// Language code, e.g. `en`
    pub hl: String,
    /// Number of results requested, and how many entries of the result list are read
    pub k: usize,
    /// Time-range filter, e.g. `qdr:d`
    pub tbs: Option<String>,
    pub search_type: SearchType,
    pub api_url: String,
    pub timeout: Duration,
    /// Skip TLS certificate verification. Opt-in only.
    pub accept_invalid_certs: bool,
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            gl: "us".to_string(),
            hl: "en".to_string(),
            k: 1,
            tbs: None,
            search_type: SearchType::default(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn builder(api_key: impl Into<String>) -> SearchConfigBuilder {
        SearchConfigBuilder {
            config: SearchConfig {
                api_key: ApiKey::new(api_key),
                ..SearchConfig::default()
            },
        }
    }

    /// Builder seeded with the API key from `SERPER_API_KEY`.
    ///
    /// A missing variable leaves the key empty; the client rejects it when a
    /// search is run.
    pub fn from_env<R: Runtime + ?Sized>(runtime: &R) -> SearchConfigBuilder {
        let key = match runtime.env_var(API_KEY_ENV) {
            Ok(key) => {
                let key = ApiKey::new(key);
                debug!("Using {} for authentication: {}", API_KEY_ENV, key);
                key
            }
            Err(_) => {
                debug!("{} is not set", API_KEY_ENV);
                ApiKey::default()
            }
        };
        SearchConfigBuilder {
            config: SearchConfig {
                api_key: key,
                ..SearchConfig::default()
            },
        }
    }

    /// Endpoint for the configured category.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.search_type.endpoint()
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(SearchError::Configuration(format!(
                "Missing API key. Set the {} environment variable.",
                API_KEY_ENV
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(SearchError::Configuration(
                "max attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn gl(mut self, gl: impl Into<String>) -> Self {
        self.config.gl = gl.into();
        self
    }

    pub fn hl(mut self, hl: impl Into<String>) -> Self {
        self.config.hl = hl.into();
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.config.k = k;
        self
    }

    pub fn tbs(mut self, tbs: Option<String>) -> Self {
        self.config.tbs = tbs;
        self
    }

    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.config.search_type = search_type;
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.config.retry.max_attempts = max_attempts;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    #[test]
    fn test_search_type_mapping() {
        assert_eq!(SearchType::Search.result_key(), "organic");
        assert_eq!(SearchType::News.result_key(), "news");
        assert_eq!(SearchType::Places.result_key(), "places");
        assert_eq!(SearchType::Images.result_key(), "images");
        assert_eq!(SearchType::Search.endpoint(), "search");
        assert_eq!(SearchType::default(), SearchType::Search);
    }

    #[test]
    fn test_search_type_from_str() {
        assert_eq!("news".parse::<SearchType>().unwrap(), SearchType::News);
        assert_eq!("IMAGES".parse::<SearchType>().unwrap(), SearchType::Images);
        assert_eq!("web".parse::<SearchType>().unwrap(), SearchType::Search);
        let err = "videos".parse::<SearchType>().unwrap_err();
        assert!(err.to_string().contains("Unknown search type"));
    }

    #[test]
    fn test_api_key_is_masked() {
        let key = ApiKey::new("abcd1234567890wxyz");
        assert_eq!(key.masked(), "abcd*********wxyz");
        assert!(!format!("{:?}", key).contains("1234567890"));
        assert_eq!(ApiKey::new("short").to_string(), "*********");
        assert_eq!(key.expose(), "abcd1234567890wxyz");
    }

    #[test]
    fn test_config_debug_does_not_leak_key() {
        let config = SearchConfig::builder("supersecretkey-0123456789").build();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecretkey-0123456789"));
    }

    #[test]
    fn test_builder_defaults() {
        let config = SearchConfig::builder("key").build();
        assert_eq!(config.gl, "us");
        assert_eq!(config.hl, "en");
        assert_eq!(config.k, 1);
        assert_eq!(config.tbs, None);
        assert_eq!(config.search_type, SearchType::Search);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.retry.max_attempts, crate::http::MAX_RETRIES);
        assert_eq!(config.endpoint_url(), "https://google.serper.dev/search");
    }

    #[test]
    fn test_builder_overrides() {
        let config = SearchConfig::builder("key")
            .gl("in")
            .hl("hi")
            .k(5)
            .tbs(Some("qdr:w".to_string()))
            .search_type(SearchType::News)
            .api_url("http://localhost:8080/")
            .accept_invalid_certs(true)
            .max_attempts(3)
            .build();

        assert_eq!(config.gl, "in");
        assert_eq!(config.hl, "hi");
        assert_eq!(config.k, 5);
        assert_eq!(config.tbs.as_deref(), Some("qdr:w"));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.endpoint_url(), "http://localhost:8080/news");
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        for key in ["", "   "] {
            let err = SearchConfig::builder(key).build().validate().unwrap_err();
            assert!(matches!(err, SearchError::Configuration(_)));
            assert!(err.to_string().contains(API_KEY_ENV));
        }
        assert!(SearchConfig::builder("key").build().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let err = SearchConfig::builder("key")
            .max_attempts(0)
            .build()
            .validate()
            .unwrap_err();
        assert!(matches!(err, SearchError::Configuration(_)));
    }

    #[test]
    fn test_from_env_reads_api_key() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(API_KEY_ENV))
            .returning(|_| Ok("env-key-0123456789".to_string()));

        let config = SearchConfig::from_env(&runtime).build();
        assert_eq!(config.api_key.expose(), "env-key-0123456789");
    }

    #[test]
    fn test_from_env_missing_key_is_empty() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(API_KEY_ENV))
            .returning(|_| Err(std::env::VarError::NotPresent));

        let config = SearchConfig::from_env(&runtime).build();
        assert!(config.api_key.is_empty());
        assert!(config.validate().is_err());
    }
}
