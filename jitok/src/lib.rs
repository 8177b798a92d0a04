//! # Sidecar Jitok
//!
//! Mints signed JWTs for video-conferencing rooms.
//!
//! A trusted backend posts the application secret and the claim fields; the
//! service validates them, fills in defaults and answers with a compact
//! HS256 or HS512 token:
//!
//! ```text
//! POST /api  {"secret":"s3cret!","aud":"app1","room":"lobby"}
//!   ← 200 eyJhbGciOiJIUzI1NiIs...
//! ```
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | token signed | 200 | the token |
//! | invalid field | 400 | `BadRequest` |
//! | not `POST /api...` | 403 | `Forbidden` |
//! | signing failed | 500 | `InternalServerError` |
//! | body is not JSON | 501 | `NotImplemented` |

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod claims;
pub mod config;
pub mod input;
pub mod router;
pub mod signer;

pub use claims::Claims;
pub use config::JitokConfig;
pub use input::TokenRequest;
pub use router::router;
pub use signer::HmacSigner;
