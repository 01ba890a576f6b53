//! # Helpdesk Testing
//!
//! Testing utilities for the helpdesk store.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations (fixed and stepping)
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use helpdesk_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(DeskReducer::new())
//!     .with_env(DeskEnvironment::new(Arc::new(test_clock())))
//!     .given_state(DeskState::default())
//!     .when_action(DeskAction::DeleteTicket { id })
//!     .then_state(|state| assert!(state.tickets.is_empty()))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use helpdesk_core::environment::Clock;

/// Given-When-Then reducer harness
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use helpdesk_testing::mocks::FixedClock;
    /// use helpdesk_core::environment::Clock;
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

    /// Clock that advances by a fixed step on every read
    ///
    /// Useful when a test needs every write to carry a strictly later
    /// timestamp than the one before it.
    ///
    /// ```
    /// use helpdesk_testing::mocks::SteppingClock;
    /// use helpdesk_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = SteppingClock::new(Utc::now(), Duration::seconds(1));
    /// let first = clock.now();
    /// assert_eq!(clock.now() - first, Duration::seconds(1));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            // A poisoned lock still holds a valid timestamp
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let current = *next;
            *next = current + self.step;
            current
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// Stepping clock starting at the test epoch, advancing one minute per read
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(test_epoch(), Duration::minutes(1))
    }

    /// 2025-01-01 00:00:00 UTC
    #[allow(clippy::expect_used)]
    fn test_epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use mocks::{stepping_clock, test_clock, FixedClock, SteppingClock};
pub use reducer_test::{assertions, ReducerTest};
