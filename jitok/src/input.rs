//! Token request validation.
//!
//! The body is a flat JSON object. Checks run field by field in this order,
//! each one presence → type → pattern, and the first failure wins:
//!
//! | Field | Required | Type | Pattern |
//! |---|---|---|---|
//! | `secret` | yes | string | `^[0-9a-zA-Z _.!@#$*+-]+$` |
//! | `aud` | yes | string | `^[0-9a-zA-Z._-]+$` |
//! | `iss`, `sub` | no | string | `*` or `^[0-9a-zA-Z._-]+$` |
//! | `room` | no | string | `*` or no `<>&%/?'"\` |
//! | `nbf`, `exp` | no | number | |
//! | `alg` | no | string | `HS256` or `HS512` |
//!
//! "Required" means set to a truthy value; a field that is `null`, `""`,
//! `0` or `false` counts as absent. The `cntx_*` fields are never rejected.

use crate::claims::{Features, UserContext};
use jsonwebtoken::Algorithm;
use serde_json::Value;
use sidecar_core::record::{display_value, is_truthy};
use sidecar_core::validate::{self, Pattern};
use sidecar_core::{RequestRecord, ServiceResult};
use std::fmt;

static SECRET: Pattern = Pattern::new(r"^[0-9a-zA-Z _.!@#$*+-]+$");
static AUD: Pattern = Pattern::new(r"^[0-9a-zA-Z._-]+$");
static ISS_SUB: Pattern = Pattern::new(r"^([*]|[0-9a-zA-Z._-]+)$");
static ROOM: Pattern = Pattern::new(r#"^([*]|[^<>&%/?'"\\]+)$"#);

/// Algorithm names accepted in `alg`.
pub const ALGORITHMS: [&str; 2] = ["HS256", "HS512"];

/// A validated token request.
#[derive(Clone, PartialEq)]
pub struct TokenRequest {
    /// HMAC key.
    pub secret: String,
    /// Audience.
    pub aud: String,
    /// Issuer.
    pub iss: Option<String>,
    /// Subject.
    pub sub: Option<String>,
    /// Room.
    pub room: Option<String>,
    /// Not-before, as seconds from now.
    pub nbf: Option<f64>,
    /// Expiry, as seconds from now.
    pub exp: Option<f64>,
    /// Signing algorithm.
    pub alg: Algorithm,
    /// `context.user` fields.
    pub user: UserContext,
    /// `context.features` switches.
    pub features: Features,
}

// The secret stays out of logs.
impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("secret", &"<redacted>")
            .field("aud", &self.aud)
            .field("iss", &self.iss)
            .field("sub", &self.sub)
            .field("room", &self.room)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("alg", &self.alg)
            .field("user", &self.user)
            .field("features", &self.features)
            .finish()
    }
}

/// Validate a token request body.
///
/// # Errors
///
/// `BadRequest` naming the first violated check.
pub fn validate(record: &RequestRecord) -> ServiceResult<TokenRequest> {
    let secret = required(record, "secret", &SECRET)?;
    let aud = required(record, "aud", &AUD)?;
    let iss = optional(record, "iss", &ISS_SUB)?;
    let sub = optional(record, "sub", &ISS_SUB)?;
    let room = optional(record, "room", &ROOM)?;
    let nbf = validate::optional_number(record, "nbf")?;
    let exp = validate::optional_number(record, "exp")?;

    let alg = match validate::optional_str(record, "alg")? {
        Some(name) => match validate::one_of("alg", name, &ALGORITHMS)? {
            "HS512" => Algorithm::HS512,
            _ => Algorithm::HS256,
        },
        None => Algorithm::HS256,
    };

    Ok(TokenRequest {
        secret: secret.to_string(),
        aud: aud.to_string(),
        iss: iss.map(ToString::to_string),
        sub: sub.map(ToString::to_string),
        room: room.map(ToString::to_string),
        nbf,
        exp,
        alg,
        user: user_context(record),
        features: features(record),
    })
}

fn required<'a>(record: &'a RequestRecord, key: &str, pattern: &Pattern) -> ServiceResult<&'a str> {
    let value = validate::as_str(key, validate::require_set(record, key)?)?;
    validate::matches(key, value, pattern)?;
    Ok(value)
}

fn optional<'a>(
    record: &'a RequestRecord,
    key: &str,
    pattern: &Pattern,
) -> ServiceResult<Option<&'a str>> {
    let value = validate::optional_str(record, key)?;
    if let Some(value) = value {
        validate::matches(key, value, pattern)?;
    }
    Ok(value)
}

fn user_context(record: &RequestRecord) -> UserContext {
    let field = |key: &str| {
        record
            .get(key)
            .filter(|value| is_truthy(value))
            .map(display_value)
    };

    UserContext {
        name: field("cntx_user_name"),
        email: field("cntx_user_email"),
        affiliation: field("cntx_user_affi"),
        avatar: field("cntx_user_avatar"),
    }
}

fn features(record: &RequestRecord) -> Features {
    // Present means enabled only for `1` or `true`; anything else disables.
    let switch = |key: &str| {
        record
            .get(key)
            .map(|value| matches!(value, Value::Bool(true)) || value.as_f64() == Some(1.0))
    };

    Features {
        recording: switch("cntx_feat_rec"),
        livestreaming: switch("cntx_feat_live"),
        screen_sharing: switch("cntx_feat_screen"),
    }
}
