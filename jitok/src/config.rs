//! Token service configuration.

use sidecar_web::config::{self, ServerConfig};

/// Environment-variable prefix.
pub const ENV_PREFIX: &str = "JITOK";

/// Configuration for the token service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JitokConfig {
    /// Listener address (`JITOK_HOST`, `JITOK_PORT`).
    pub server: ServerConfig,
}

impl JitokConfig {
    /// Load from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(config::env_lookup)
    }

    /// Load through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig::from_lookup(ENV_PREFIX, 9000, lookup),
        }
    }
}
