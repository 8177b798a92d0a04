//! # Sidecar Core
//!
//! Pure building blocks shared by every sidecar service.
//!
//! Each service is the same one-pass pipeline:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Extract    │ → │   Validate   │ → │   Perform    │ → │   Dispatch   │
//! │ RequestRecord│   │ typed input  │   │ side effect  │   │ status, body │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! This crate owns everything in that pipeline that does no I/O:
//!
//! - [`record::RequestRecord`]: the key/value bag pulled from a query string
//!   or JSON body
//! - [`validate`]: presence, type and pattern/range checks that stop at the
//!   first violation
//! - [`error::ServiceError`]: the closed error taxonomy
//! - [`dispatch::Reply`]: the outcome → (status, body) mapping
//! - [`action::ActionPerformer`]: the seam where services plug in their side
//!   effect
//! - [`environment::Clock`]: time, injected so token claims are testable
//!
//! The HTTP shell lives in `sidecar-web`.

pub mod action;
pub mod dispatch;
pub mod error;
pub mod record;
pub mod validate;

pub use action::ActionPerformer;
pub use dispatch::{BodyStyle, Reply};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use record::RequestRecord;

/// Environment traits injected into services.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use sidecar_core::environment::Clock;
    ///
    /// struct FixedClock {
    ///     time: DateTime<Utc>,
    /// }
    ///
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
