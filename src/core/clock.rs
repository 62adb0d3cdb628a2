//! Wall-clock access
//!
//! The engine never reads the system time directly. Seasonality, market
//! event decay and alert timestamps all go through a `Clock`, so tests can
//! pin or advance time explicitly.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::core::types::{Timestamp, MS_PER_DAY};

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Timestamp;
}

/// Real time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: Timestamp) -> Self {
        Self { now: AtomicI64::new(start_ms) }
    }

    pub fn set(&self, ms: Timestamp) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: f64) {
        self.advance_ms((days * MS_PER_DAY as f64) as i64);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance_ms(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.advance_days(1.0);
        assert_eq!(clock.now_ms(), 1_500 + MS_PER_DAY);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
