//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the side effects the
//! search client needs, enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `env` - Environment variables
//! - `clock` - Sleeping between attempts and backoff jitter

mod clock;
mod env;

use async_trait::async_trait;
use std::env as std_env;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // Time
    async fn sleep(&self, duration: Duration);

    /// Uniformly distributed number of seconds in `[low, high]`.
    fn uniform_secs(&self, low: f64, high: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

#[async_trait]
impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    async fn sleep(&self, duration: Duration) {
        self.sleep_impl(duration).await
    }

    fn uniform_secs(&self, low: f64, high: f64) -> f64 {
        self.uniform_secs_impl(low, high)
    }
}
