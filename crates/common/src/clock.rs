//! Wall clock used to stamp exported files.
//!
//! Rendering never reads a clock; only export naming does. Keeping the
//! source behind a trait lets tests pin the timestamp.

/// Source of wall-clock time in Unix milliseconds.
pub trait WallClock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn unix_millis(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn unix_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl WallClock for FixedClock {
    fn unix_millis(&self) -> i64 {
        self.millis
    }
}

/// Render a millisecond timestamp as RFC 3339 for log output.
pub fn millis_to_rfc3339(millis: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let clock = FixedClock::new(1_700_000_000_123);
        assert_eq!(clock.unix_millis(), 1_700_000_000_123);
        assert_eq!(clock.unix_millis(), clock.unix_millis());
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.unix_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_rfc3339_rendering() {
        assert_eq!(
            millis_to_rfc3339(0).as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
    }
}
