//! # Sidecar Event Proxy
//!
//! Relays room and occupant lifecycle webhooks from a video-conferencing
//! server to a downstream API, re-shaped to the few fields downstream cares
//! about.
//!
//! Delivery is fire-and-forget: the conference server gets `200 ok` as soon
//! as the path is recognised, and a slow or broken downstream never slows
//! down or fails the webhook. Optional bearer authentication protects the
//! inbound side.
//!
//! ```text
//! conference server ──POST /events/room/created──▶ event-proxy ──200 ok──▶
//!                                                      │
//!                                                      └─(spawned)─POST {"event":"room created","room":"..."}──▶ downstream
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod config;
pub mod event;
pub mod forwarder;
pub mod router;

pub use config::{Endpoints, EventProxyConfig};
pub use event::{EventKind, RelayEvent};
pub use forwarder::HttpForwarder;
pub use router::router;
