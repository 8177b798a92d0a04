//! Echo service configuration.

use sidecar_web::config::{self, ServerConfig};
use std::time::Duration;

/// Environment-variable prefix.
pub const ENV_PREFIX: &str = "ECHO";

/// `ncat` timeout when `ECHO_PROBE_TIMEOUT_SECS` is unset, unparsable, or `0`.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 6;

/// Configuration for the echo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoConfig {
    /// Listener address (`ECHO_HOST`, `ECHO_PORT`).
    pub server: ServerConfig,
    /// `timeout` given to `ncat` (`ECHO_PROBE_TIMEOUT_SECS`).
    pub probe_timeout: Duration,
    /// Shell the probe line is piped into (`ECHO_SHELL`).
    pub shell: String,
}

impl EchoConfig {
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
        let probe_timeout_secs =
            match config::parse_or(&lookup, "ECHO_PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_SECS) {
                0 => DEFAULT_PROBE_TIMEOUT_SECS,
                secs => secs,
            };

        Self {
            server: ServerConfig::from_lookup(ENV_PREFIX, 9000, &lookup),
            probe_timeout: Duration::from_secs(probe_timeout_secs),
            shell: config::string_or(&lookup, "ECHO_SHELL", "bash"),
        }
    }

    /// Set the probe timeout.
    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the shell.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecar_testing::helpers::lookup_from;

    #[test]
    fn test_defaults() {
        let config = EchoConfig::default();

        assert_eq!(config.server, ServerConfig::new("0.0.0.0", 9000));
        assert_eq!(config.probe_timeout, Duration::from_secs(6));
        assert_eq!(config.shell, "bash");
    }

    #[test]
    fn test_overrides() {
        let config = EchoConfig::from_lookup(lookup_from(&[
            ("ECHO_HOST", "127.0.0.1"),
            ("ECHO_PORT", "9100"),
            ("ECHO_PROBE_TIMEOUT_SECS", "3"),
            ("ECHO_SHELL", "/bin/sh"),
        ]));

        assert_eq!(config.server, ServerConfig::new("127.0.0.1", 9100));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.shell, "/bin/sh");
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = EchoConfig::from_lookup(lookup_from(&[("ECHO_PROBE_TIMEOUT_SECS", "0")]));
        assert_eq!(config.probe_timeout, Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = EchoConfig::from_lookup(lookup_from(&[("ECHO_PROBE_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.probe_timeout, Duration::from_secs(6));
    }
}
