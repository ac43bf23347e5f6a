//! Clock abstraction for notification timestamps.
//!
//! The forwarding timestamp is taken from an injected clock so tests can pin
//! it; production uses `RealClock`.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Utc};

/// Source of wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current system time.
    fn now_system(&self) -> SystemTime;

    /// Returns the current system time as a UTC date-time.
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.now_system())
    }
}

/// Real clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock instance.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now_system(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Settable clock for deterministic tests.
///
/// Clones share the same time, so a clock handed to the application can be
/// moved from the test body.
#[derive(Debug, Clone)]
pub struct TestClock {
    /// System time as nanoseconds since UNIX_EPOCH
    system_ns: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a test clock starting at the current system time.
    pub fn new() -> Self {
        Self::with_start_time(SystemTime::now())
    }

    /// Creates a test clock starting at `start`.
    pub fn with_start_time(start: SystemTime) -> Self {
        let clock = Self { system_ns: Arc::new(AtomicU64::new(0)) };
        clock.set(start);
        clock
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: SystemTime) {
        let since_epoch = at.duration_since(UNIX_EPOCH).unwrap_or_default();
        let nanos = u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX);
        self.system_ns.store(nanos, Ordering::Release);
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now_system(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(self.system_ns.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_system_time() {
        let start = UNIX_EPOCH + Duration::from_secs(1000);
        let clock = TestClock::with_start_time(start);

        assert_eq!(clock.now_system(), start);

        clock.set(start + Duration::from_millis(1500));
        assert_eq!(clock.now_system(), start + Duration::from_millis(1500));
    }

    #[test]
    fn clones_share_time() {
        let clock = TestClock::with_start_time(UNIX_EPOCH);
        let handle = clock.clone();

        handle.set(UNIX_EPOCH + Duration::from_secs(5));
        assert_eq!(clock.now_system(), UNIX_EPOCH + Duration::from_secs(5));
    }

    #[test]
    fn utc_conversion_matches_system_time() {
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(86_400));
        assert_eq!(clock.now_utc().to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }
}
