//! The claim set encoded into a room token.

use crate::input::TokenRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a token when the request gives no `exp`.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Wildcard used for `sub` and `room` when the request leaves them out.
pub const WILDCARD: &str = "*";

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Audience (application id).
    pub aud: String,
    /// Issuer, defaulting to the audience.
    pub iss: String,
    /// Subject (tenant / domain), `*` for any.
    pub sub: String,
    /// Room name, `*` for any.
    pub room: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Not-before, seconds since the epoch.
    pub nbf: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Per-user context, omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

/// `context` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Display information about the participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserContext>,
    /// Feature switches for the participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,
}

/// `context.user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `owner`, `member`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserContext {
    /// True when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.affiliation.is_none() && self.avatar.is_none()
    }
}

/// `context.features`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// Recording allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<bool>,
    /// Live streaming allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub livestreaming: Option<bool>,
    /// Screen sharing allowed.
    #[serde(
        default,
        rename = "screen-sharing",
        skip_serializing_if = "Option::is_none"
    )]
    pub screen_sharing: Option<bool>,
}

impl Features {
    /// True when no switch is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.recording.is_none() && self.livestreaming.is_none() && self.screen_sharing.is_none()
    }
}

impl Claims {
    /// Build the claim set for `request` as issued at `now`.
    ///
    /// Offsets are added to `now` and rounded to whole seconds, halves
    /// upward (`-30.5` → `-30`).
    #[must_use]
    pub fn build(request: &TokenRequest, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();

        let user = Some(request.user.clone()).filter(|user| !user.is_empty());
        let features = Some(request.features).filter(|features| !features.is_empty());
        let context = (user.is_some() || features.is_some()).then_some(Context { user, features });

        Self {
            aud: request.aud.clone(),
            iss: request.iss.clone().unwrap_or_else(|| request.aud.clone()),
            sub: request.sub.clone().unwrap_or_else(|| WILDCARD.to_string()),
            room: request.room.clone().unwrap_or_else(|| WILDCARD.to_string()),
            iat,
            nbf: request.nbf.map_or(iat, |offset| offset_from(iat, offset)),
            exp: request
                .exp
                .map_or(iat + DEFAULT_TTL_SECS, |offset| offset_from(iat, offset)),
            context,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn offset_from(iat: i64, offset_secs: f64) -> i64 {
    (iat as f64 + offset_secs + 0.5).floor() as i64
}
