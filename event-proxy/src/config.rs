//! Event relay configuration.

use crate::event::EventKind;
use sidecar_web::config::{self, ServerConfig};
use std::time::Duration;

/// Environment-variable prefix.
pub const ENV_PREFIX: &str = "EVENT_PROXY";

/// Downstream URL for each event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Target for `occupant joined` (`EVENT_PROXY_OCCUPANT_JOINED_URL`).
    pub occupant_joined: String,
    /// Target for `occupant left` (`EVENT_PROXY_OCCUPANT_LEFT_URL`).
    pub occupant_left: String,
    /// Target for `room created` (`EVENT_PROXY_ROOM_CREATED_URL`).
    pub room_created: String,
    /// Target for `room destroyed` (`EVENT_PROXY_ROOM_DESTROYED_URL`).
    pub room_destroyed: String,
}

impl Endpoints {
    /// All four kinds under one base URL, e.g. `http://127.0.0.1:8000/api`.
    #[must_use]
    pub fn under(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            occupant_joined: format!("{base}/occupant/joined"),
            occupant_left: format!("{base}/occupant/left"),
            room_created: format!("{base}/room/created"),
            room_destroyed: format!("{base}/room/destroyed"),
        }
    }

    /// URL an event of `kind` is posted to.
    #[must_use]
    pub fn url_for(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::OccupantJoined => &self.occupant_joined,
            EventKind::OccupantLeft => &self.occupant_left,
            EventKind::RoomCreated => &self.room_created,
            EventKind::RoomDestroyed => &self.room_destroyed,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::under("http://127.0.0.1:8000/api")
    }
}

/// Configuration for the event relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventProxyConfig {
    /// Listener address (`EVENT_PROXY_HOST`, `EVENT_PROXY_PORT`).
    pub server: ServerConfig,
    /// Shared bearer token (`EVENT_PROXY_TOKEN`). Unset or empty disables
    /// authentication.
    pub token: Option<String>,
    /// Downstream targets.
    pub endpoints: Endpoints,
    /// Per-request timeout for forwarding (`EVENT_PROXY_FORWARD_TIMEOUT_SECS`).
    pub forward_timeout: Duration,
}

impl EventProxyConfig {
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
        let defaults = Endpoints::default();
        let url = |key: &str, default: &str| config::string_or(&lookup, key, default);

        Self {
            server: ServerConfig::from_lookup(ENV_PREFIX, 3000, &lookup),
            token: lookup("EVENT_PROXY_TOKEN").filter(|token| !token.is_empty()),
            endpoints: Endpoints {
                occupant_joined: url("EVENT_PROXY_OCCUPANT_JOINED_URL", &defaults.occupant_joined),
                occupant_left: url("EVENT_PROXY_OCCUPANT_LEFT_URL", &defaults.occupant_left),
                room_created: url("EVENT_PROXY_ROOM_CREATED_URL", &defaults.room_created),
                room_destroyed: url("EVENT_PROXY_ROOM_DESTROYED_URL", &defaults.room_destroyed),
            },
            forward_timeout: Duration::from_secs(config::parse_or(
                &lookup,
                "EVENT_PROXY_FORWARD_TIMEOUT_SECS",
                10,
            )),
        }
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the downstream targets.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecar_testing::helpers::lookup_from;

    #[test]
    fn test_defaults() {
        let config = EventProxyConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config.server, ServerConfig::new("0.0.0.0", 3000));
        assert_eq!(config.token, None);
        assert_eq!(
            config.endpoints.url_for(EventKind::OccupantJoined),
            "http://127.0.0.1:8000/api/occupant/joined"
        );
        assert_eq!(
            config.endpoints.url_for(EventKind::RoomDestroyed),
            "http://127.0.0.1:8000/api/room/destroyed"
        );
        assert_eq!(config.forward_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = EventProxyConfig::from_lookup(lookup_from(&[
            ("EVENT_PROXY_PORT", "3100"),
            ("EVENT_PROXY_TOKEN", "hunter2"),
            ("EVENT_PROXY_ROOM_CREATED_URL", "http://api.internal/rooms"),
            ("EVENT_PROXY_FORWARD_TIMEOUT_SECS", "2"),
        ]));

        assert_eq!(config.server.port, 3100);
        assert_eq!(config.token.as_deref(), Some("hunter2"));
        assert_eq!(config.endpoints.room_created, "http://api.internal/rooms");
        assert_eq!(
            config.endpoints.occupant_left,
            "http://127.0.0.1:8000/api/occupant/left"
        );
        assert_eq!(config.forward_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_empty_token_disables_auth() {
        let config = EventProxyConfig::from_lookup(lookup_from(&[("EVENT_PROXY_TOKEN", "")]));
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_endpoints_under_trims_slash() {
        let endpoints = Endpoints::under("http://localhost:9999/");
        assert_eq!(endpoints.occupant_joined, "http://localhost:9999/occupant/joined");
    }
}
