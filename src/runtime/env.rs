//! Environment variable lookups.

use std::env;

use super::RealRuntime;

impl RealRuntime {
    // Not instrumented: the value may be a credential.
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}
