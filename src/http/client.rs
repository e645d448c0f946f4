//! HTTP client with built-in retry logic and error handling.

use log::debug;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::retry::{RetryPolicy, with_retry};
use crate::error::Result;
use crate::runtime::{RealRuntime, Runtime};

/// HTTP client with built-in retry logic for network operations.
pub struct HttpClient<R: Runtime = RealRuntime> {
    client: Client,
    runtime: Arc<R>,
    policy: RetryPolicy,
}

impl<R: Runtime> Clone for HttpClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            runtime: Arc::clone(&self.runtime),
            policy: self.policy.clone(),
        }
    }
}

impl<R: Runtime> HttpClient<R> {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, runtime: R, policy: RetryPolicy) -> Self {
        Self {
            client,
            runtime: Arc::new(runtime),
            policy,
        }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Performs a POST request with a JSON body and deserializes the JSON response.
    /// Automatically retries on transport errors; a body that fails to decode is not retried.
    #[tracing::instrument(skip(self, headers, body))]
    pub async fn post_json<B, T>(&self, url: &str, headers: &HeaderMap, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST JSON to {}...", url);

        let client = &self.client;
        let bytes = with_retry(self.runtime.as_ref(), &self.policy, "POST JSON", || async move {
            let response = client
                .post(url)
                .headers(headers.clone())
                .json(body)
                .send()
                .await?;

            let response = response.error_for_status()?;
            let bytes = response.bytes().await?;

            Ok(bytes)
        })
        .await?;

        debug!("Received {} bytes from {}", bytes.len(), url);

        let result = serde_json::from_slice::<T>(&bytes)?;
        Ok(result)
    }
}
