//! Listener configuration.
//!
//! Every service reads `<PREFIX>_HOST` and `<PREFIX>_PORT` from the
//! environment. Loading goes through a lookup function so tests can supply
//! values without touching the process environment.

use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning configuration into a bind address.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `host:port` does not parse as a socket address.
    #[error("invalid bind address {address}: {reason}")]
    InvalidAddress {
        /// The rejected `host:port` string.
        address: String,
        /// Parser message.
        reason: String,
    },
}

/// Load `.env` from the working directory if there is one.
///
/// A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }
}

/// Process-environment lookup.
#[must_use]
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse `key` through `lookup`, falling back to `default` when the variable
/// is missing or does not parse.
pub fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Read `key` through `lookup`, falling back to `default`.
pub fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Address a service listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl ServerConfig {
    /// Create a configuration for `host:port`.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Load `<PREFIX>_HOST` / `<PREFIX>_PORT` from the process environment.
    #[must_use]
    pub fn from_env(prefix: &str, default_port: u16) -> Self {
        Self::from_lookup(prefix, default_port, env_lookup)
    }

    /// Load `<PREFIX>_HOST` / `<PREFIX>_PORT` through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(prefix: &str, default_port: u16, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: string_or(&lookup, &format!("{prefix}_HOST"), "0.0.0.0"),
            port: parse_or(&lookup, &format!("{prefix}_PORT"), default_port),
        }
    }

    /// Set the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] when `host:port` does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
                reason: e.to_string(),
                address,
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 9000)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sidecar_testing::helpers::lookup_from as lookup;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup("ECHO", 9000, lookup(&[]));
        assert_eq!(config, ServerConfig::new("0.0.0.0", 9000));
    }

    #[test]
    fn test_prefixed_values() {
        let config = ServerConfig::from_lookup(
            "EVENT_PROXY",
            3000,
            lookup(&[("EVENT_PROXY_HOST", "127.0.0.1"), ("EVENT_PROXY_PORT", "3100")]),
        );
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3100);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup("JITOK", 9000, lookup(&[("JITOK_PORT", "http")]));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::new("127.0.0.1", 8080).socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);

        let err = ServerConfig::new("not a host", 8080).socket_addr().unwrap_err();
        assert!(err.to_string().contains("not a host:8080"));
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::default().with_host("::1").with_port(1);
        assert_eq!(config.host, "::1");
        assert_eq!(config.port, 1);
    }
}
