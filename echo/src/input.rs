//! Echo request validation.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. the request has a query string
//! 2. `X-Forwarded-For` is present and looks like an IPv4 address
//! 3. `proto`, `port` and `text` are present
//! 4. `proto` is `tcp` or `udp`
//! 5. `port` is all digits and within 20..=65535
//! 6. `text` is plain words (letters, digits, space, `_`, `-`), at most 100 chars

use sidecar_core::validate::{self, Pattern};
use sidecar_core::{RequestRecord, ServiceError, ServiceResult};
use std::fmt;

static ADDR: Pattern = Pattern::new("^[0-9.]+$");
static TEXT: Pattern = Pattern::new("^[0-9a-zA-Z _-]+$");

/// Lowest port a probe may target.
pub const MIN_PORT: u16 = 20;

/// Longest text a probe may carry, in characters.
pub const MAX_TEXT_CHARS: usize = 100;

/// Transport for the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Stream connection.
    Tcp,
    /// Single datagram.
    Udp,
}

impl Protocol {
    /// Wire name as it appears in the query string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoInput {
    /// Caller address, taken from `X-Forwarded-For`.
    pub addr: String,
    /// Target port on the caller.
    pub port: u16,
    /// Transport.
    pub proto: Protocol,
    /// Line to send.
    pub text: String,
}

/// Build an [`EchoInput`] from the query record and the raw
/// `X-Forwarded-For` header.
///
/// `query` is `None` when the request URI had no `?` at all.
///
/// # Errors
///
/// `BadRequest` naming the first violated check.
pub fn validate(query: Option<&RequestRecord>, forwarded_for: Option<&str>) -> ServiceResult<EchoInput> {
    let query = query.ok_or_else(|| ServiceError::bad_request("no query string"))?;

    let addr = forwarded_for.ok_or_else(|| ServiceError::bad_request("remote_ip not found"))?;
    whitelist("addr", addr, &ADDR)?;

    let proto = present_str(query, "proto")?;
    let port = present_str(query, "port")?;
    let text = present_str(query, "text")?;

    let proto = match validate::one_of("proto", proto, &["tcp", "udp"])? {
        "udp" => Protocol::Udp,
        _ => Protocol::Tcp,
    };

    let port = validate::digits_in_range("port", port, u32::from(MIN_PORT)..=u32::from(u16::MAX))?;
    let port = u16::try_from(port).map_err(|_| ServiceError::bad_request("port out of range"))?;

    whitelist("text", text, &TEXT)?;
    validate::max_chars("text", text, MAX_TEXT_CHARS)?;

    Ok(EchoInput {
        addr: addr.to_string(),
        port,
        proto,
        text: text.to_string(),
    })
}

// Query values are always strings; an empty value still counts as present.
fn present_str<'a>(query: &'a RequestRecord, key: &str) -> ServiceResult<&'a str> {
    let value = validate::require_present(query, key)?;
    validate::as_str(key, value)
}

fn whitelist(key: &str, value: &str, pattern: &Pattern) -> ServiceResult<()> {
    if pattern.is_match(value)? {
        Ok(())
    } else {
        Err(ServiceError::bad_request(format!("invalid {key}")))
    }
}
