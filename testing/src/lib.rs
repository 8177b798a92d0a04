//! # Sidecar Testing
//!
//! Testing utilities for the sidecar services.
//!
//! This crate provides:
//! - Mock action performers that record what they were asked to do
//! - A fixed clock for deterministic token claims
//! - Config lookups built from literal key/value pairs
//! - proptest strategies for the shared input shapes
//!
//! ## Example
//!
//! ```ignore
//! use sidecar_testing::mocks::RecordingPerformer;
//!
//! #[tokio::test]
//! async fn test_probe_not_run_on_bad_input() {
//!     let probe = RecordingPerformer::succeeding(());
//!     let app = echo::router(probe.clone());
//!     // ... send a request missing `port` ...
//!     assert_eq!(probe.call_count(), 0);
//! }
//! ```

use chrono::{DateTime, Utc};
use sidecar_core::environment::Clock;

/// Mock implementations of environment traits and action performers.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use sidecar_core::{ActionPerformer, ServiceError, ServiceResult};
    use std::future::Future;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use sidecar_testing::mocks::FixedClock;
    /// use sidecar_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC,
    /// Unix time 1 735 689 600).
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Action performer that records every input and answers with a canned
    /// result.
    ///
    /// Clones share the same recording, so a test can keep one handle and
    /// give another to the router.
    #[derive(Debug)]
    pub struct RecordingPerformer<I, O> {
        calls: Arc<Mutex<Vec<I>>>,
        result: ServiceResult<O>,
    }

    impl<I, O: Clone> Clone for RecordingPerformer<I, O> {
        fn clone(&self) -> Self {
            Self {
                calls: Arc::clone(&self.calls),
                result: self.result.clone(),
            }
        }
    }

    impl<I, O> RecordingPerformer<I, O> {
        /// Performer that always succeeds with `output`.
        #[must_use]
        pub fn succeeding(output: O) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                result: Ok(output),
            }
        }

        /// Performer that always fails with `error`.
        #[must_use]
        pub fn failing(error: ServiceError) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                result: Err(error),
            }
        }

        /// Number of times the action ran.
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
        }
    }

    impl<I: Clone, O> RecordingPerformer<I, O> {
        /// Inputs seen so far, in call order.
        #[must_use]
        pub fn calls(&self) -> Vec<I> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    impl<I, O> ActionPerformer<I> for RecordingPerformer<I, O>
    where
        I: Send + 'static,
        O: Clone + Send + Sync + 'static,
    {
        type Output = O;

        fn perform(&self, input: I) -> impl Future<Output = ServiceResult<O>> + Send {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(input);
            let result = self.result.clone();
            async move { result }
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Build a config lookup from literal pairs, standing in for the process
    /// environment.
    ///
    /// ```
    /// let lookup = sidecar_testing::helpers::lookup_from(&[("ECHO_PORT", "9100")]);
    /// assert_eq!(lookup("ECHO_PORT").as_deref(), Some("9100"));
    /// assert_eq!(lookup("ECHO_HOST"), None);
    /// ```
    #[must_use]
    pub fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    /// Poll `condition` until it holds or `timeout` passes.
    ///
    /// For work a handler hands off to a spawned task. Returns whether the
    /// condition was met.
    pub async fn eventually<F>(condition: F, timeout: Duration) -> bool
    where
        F: Fn() -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if condition() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Free text accepted by the echo validator (1 to 100 characters).
    pub fn echo_text() -> impl Strategy<Value = String> {
        "[0-9a-zA-Z _-]{1,100}"
    }

    /// Dotted-quad address.
    pub fn ipv4_address() -> impl Strategy<Value = String> {
        (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
    }

    /// Port inside the echo range.
    pub fn echo_port() -> impl Strategy<Value = u16> {
        20u16..=65535
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, RecordingPerformer, test_clock};
