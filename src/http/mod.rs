//! HTTP client module with retry logic and error handling.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{
    Backoff, INITIAL_JITTER_SECS, MAX_BACKOFF, MAX_RETRIES, RetryPolicy, with_retry,
};
