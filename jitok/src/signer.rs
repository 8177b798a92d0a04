//! HMAC token signing.

use crate::claims::Claims;
use crate::input::TokenRequest;
use jsonwebtoken::{EncodingKey, Header};
use sidecar_core::environment::{Clock, SystemClock};
use sidecar_core::{ActionPerformer, ServiceError, ServiceResult};
use std::future::Future;

/// Signs claim sets with the secret carried in each request.
///
/// The clock is injected so issued-at times are reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct HmacSigner<C = SystemClock> {
    clock: C,
}

impl<C: Clock> HmacSigner<C> {
    /// Create a signer reading time from `clock`.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Build the claims for `request` and sign them.
    ///
    /// # Errors
    ///
    /// `ActionFailed` if the token cannot be encoded.
    pub fn sign(&self, request: &TokenRequest) -> ServiceResult<String> {
        let claims = Claims::build(request, self.clock.now());
        let key = EncodingKey::from_secret(request.secret.as_bytes());

        jsonwebtoken::encode(&Header::new(request.alg), &claims, &key)
            .map_err(|e| ServiceError::action_failed(format!("cannot sign token: {e}")))
    }
}

impl<C: Clock> ActionPerformer<TokenRequest> for HmacSigner<C> {
    type Output = String;

    fn perform(&self, input: TokenRequest) -> impl Future<Output = ServiceResult<String>> + Send {
        std::future::ready(self.sign(&input))
    }
}
