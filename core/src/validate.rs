//! Field validation primitives.
//!
//! Services compose these into a fixed-order validator: presence, then type,
//! then pattern or range. The first violation short-circuits with a
//! `BadRequest` naming the field; errors are never accumulated.
//!
//! # Example
//!
//! ```
//! use sidecar_core::RequestRecord;
//! use sidecar_core::validate::{self, Pattern};
//!
//! static NAME: Pattern = Pattern::new("^[a-z]+$");
//!
//! # fn main() -> Result<(), sidecar_core::ServiceError> {
//! let record = RequestRecord::from_query("name=alice&port=8080")?;
//!
//! let name = validate::as_str("name", validate::require_set(&record, "name")?)?;
//! validate::matches("name", name, &NAME)?;
//!
//! let port = validate::digits_in_range("port", record.get_str("port").unwrap_or(""), 20..=65535)?;
//! assert_eq!(port, 8080);
//! # Ok(())
//! # }
//! ```

use crate::error::{ServiceError, ServiceResult};
use crate::record::RequestRecord;
use regex::Regex;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// A whitelist pattern compiled on first use.
///
/// `Pattern::new` is `const`, so patterns can live in `static`s next to the
/// validator that uses them.
#[derive(Debug)]
pub struct Pattern {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    /// Declare a pattern. It is compiled on the first match.
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// The pattern source.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    /// Test `value` against the pattern.
    ///
    /// # Errors
    ///
    /// Returns `Unclassified` if the pattern itself does not compile.
    pub fn is_match(&self, value: &str) -> ServiceResult<bool> {
        self.compiled
            .get_or_init(|| Regex::new(self.source).ok())
            .as_ref()
            .map(|regex| regex.is_match(value))
            .ok_or_else(|| {
                ServiceError::unclassified(format!("pattern {} does not compile", self.source))
            })
    }
}

/// Require `key` to be present, whatever its value.
///
/// # Errors
///
/// `BadRequest` (`"<key> not found"`) when the key is missing.
pub fn require_present<'a>(record: &'a RequestRecord, key: &str) -> ServiceResult<&'a Value> {
    record
        .get(key)
        .ok_or_else(|| ServiceError::bad_request(format!("{key} not found")))
}

/// Require `key` to hold a truthy value.
///
/// # Errors
///
/// `BadRequest` (`"<key> not found"`) when the key is missing or falsy.
pub fn require_set<'a>(record: &'a RequestRecord, key: &str) -> ServiceResult<&'a Value> {
    match record.get(key) {
        Some(value) if crate::record::is_truthy(value) => Ok(value),
        _ => Err(ServiceError::bad_request(format!("{key} not found"))),
    }
}

/// Require a value to be a string.
///
/// # Errors
///
/// `BadRequest` (`"invalid <key>"`) for any other JSON type.
pub fn as_str<'a>(key: &str, value: &'a Value) -> ServiceResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ServiceError::bad_request(format!("invalid {key}")))
}

/// Require a value to be a number.
///
/// # Errors
///
/// `BadRequest` (`"invalid <key>"`) for any other JSON type.
pub fn as_number(key: &str, value: &Value) -> ServiceResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ServiceError::bad_request(format!("invalid {key}")))
}

/// An optional string: falsy or missing means `None`.
///
/// # Errors
///
/// `BadRequest` when set to a non-string.
pub fn optional_str<'a>(record: &'a RequestRecord, key: &str) -> ServiceResult<Option<&'a str>> {
    match record.get(key) {
        Some(value) if crate::record::is_truthy(value) => as_str(key, value).map(Some),
        _ => Ok(None),
    }
}

/// An optional number: falsy or missing means `None`.
///
/// # Errors
///
/// `BadRequest` when set to a non-number.
pub fn optional_number(record: &RequestRecord, key: &str) -> ServiceResult<Option<f64>> {
    match record.get(key) {
        Some(value) if crate::record::is_truthy(value) => as_number(key, value).map(Some),
        _ => Ok(None),
    }
}

/// Require the whole of `value` to match `pattern`.
///
/// # Errors
///
/// `BadRequest` (`"invalid character in <key>"`) on mismatch.
pub fn matches(key: &str, value: &str, pattern: &Pattern) -> ServiceResult<()> {
    if pattern.is_match(value)? {
        Ok(())
    } else {
        Err(ServiceError::bad_request(format!("invalid character in {key}")))
    }
}

/// Require a closed-set value.
///
/// # Errors
///
/// `BadRequest` (`"invalid <key>"`) when `value` is not in `allowed`.
pub fn one_of<'a>(key: &str, value: &'a str, allowed: &[&str]) -> ServiceResult<&'a str> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(ServiceError::bad_request(format!("invalid {key}")))
    }
}

/// Parse a digit-only string and range-check it.
///
/// # Errors
///
/// `BadRequest` with `"invalid <key>"` when `value` is empty or has a
/// non-digit, `"<key> out of range"` when it falls outside `range`.
pub fn digits_in_range(key: &str, value: &str, range: RangeInclusive<u32>) -> ServiceResult<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServiceError::bad_request(format!("invalid {key}")));
    }

    // Only overflow can fail here; an overflowing number is out of any u32 range.
    value
        .parse::<u32>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| ServiceError::bad_request(format!("{key} out of range")))
}

/// Cap the length of free text, counted in characters.
///
/// # Errors
///
/// `BadRequest` (`"very long <key>"`) past `max` characters.
pub fn max_chars(key: &str, value: &str, max: usize) -> ServiceResult<()> {
    if value.chars().count() > max {
        Err(ServiceError::bad_request(format!("very long {key}")))
    } else {
        Ok(())
    }
}
