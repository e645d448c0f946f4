use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SearchConfig;

/// Per-call overrides of the configured request parameters.
///
/// `None` values fall back to the client's [`SearchConfig`]; null entries in
/// `extra` are dropped.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SearchOverrides {
    pub num: Option<usize>,
    pub gl: Option<String>,
    pub hl: Option<String>,
    pub tbs: Option<String>,
    /// Any other parameter the service understands, e.g. `page` or `location`.
    pub extra: Map<String, Value>,
}

impl SearchOverrides {
    /// Number of results to request and read.
    pub fn effective_k(&self, config: &SearchConfig) -> usize {
        self.num.unwrap_or(config.k)
    }
}

/// JSON body of a search request: `{q, gl, hl, num, tbs?, ...extra}`.
pub fn build_request_body(
    config: &SearchConfig,
    query: &str,
    overrides: &SearchOverrides,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("q".to_string(), Value::from(query));
    body.insert(
        "gl".to_string(),
        Value::from(overrides.gl.as_deref().unwrap_or(&config.gl)),
    );
    body.insert(
        "hl".to_string(),
        Value::from(overrides.hl.as_deref().unwrap_or(&config.hl)),
    );
    body.insert("num".to_string(), Value::from(overrides.effective_k(config)));
    if let Some(tbs) = overrides.tbs.as_ref().or(config.tbs.as_ref()) {
        body.insert("tbs".to_string(), Value::from(tbs.as_str()));
    }

    for (key, value) in &overrides.extra {
        // The query always comes from the caller's argument.
        if value.is_null() || key == "q" {
            continue;
        }
        body.insert(key.clone(), value.clone());
    }

    body
}
