//! The action-performer seam.
//!
//! Each service performs exactly one side effect per validated request:
//! spawning a probe, forwarding an event, signing a token. The core treats it
//! as a black box behind this trait so handlers can be exercised with mocks.

use crate::error::ServiceResult;
use std::future::Future;
use std::sync::Arc;

/// Performs the side effect for a validated input.
///
/// Implementations map their own failures to a [`crate::ServiceError`],
/// normally `ActionFailed`.
pub trait ActionPerformer<I>: Send + Sync {
    /// Value produced on success (e.g. `()` or a signed token).
    type Output: Send;

    /// Run the action once. Never retried by callers.
    ///
    /// # Errors
    ///
    /// Returns a classified error when the action fails.
    fn perform(&self, input: I) -> impl Future<Output = ServiceResult<Self::Output>> + Send;
}

impl<I, P> ActionPerformer<I> for Arc<P>
where
    P: ActionPerformer<I>,
{
    type Output = P::Output;

    fn perform(&self, input: I) -> impl Future<Output = ServiceResult<Self::Output>> + Send {
        (**self).perform(input)
    }
}
