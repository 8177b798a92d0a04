//! # Sidecar Echo
//!
//! A network-probe endpoint. A caller behind a reverse proxy asks the service
//! to send a short line of text back to its own address, over TCP or UDP, to
//! check that a port is reachable from the outside.
//!
//! ```text
//! GET /?proto=udp&port=5000&text=hello      X-Forwarded-For: 203.0.113.7
//!   → echo hello | timeout 6 ncat -u 203.0.113.7 5000
//!   ← 200 ok
//! ```
//!
//! Invalid input answers `400 BadRequest` before anything is spawned; a probe
//! that cannot be started answers `500 InternalServerError`; non-`GET`
//! requests answer `403 Forbidden`.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod config;
pub mod input;
pub mod probe;
pub mod router;

pub use config::EchoConfig;
pub use input::{EchoInput, Protocol};
pub use probe::NcatProbe;
pub use router::router;
