//! Display inactivity timer

/// Default idle time before the panel blanks
pub const INACTIVITY_TIMEOUT_MS: u64 = 60_000;

/// Result of recording user activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Panel was already on
    Awake,
    /// Panel was asleep; the input that woke it must be consumed
    WokeUp,
}

/// Tracks idle time and the sleeping flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepTimer {
    timeout_ms: u64,
    last_activity_ms: u64,
    sleeping: bool,
}

impl SleepTimer {
    pub fn new(timeout_ms: u64, now_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_activity_ms: now_ms,
            sleeping: false,
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Note user input at `now_ms`
    pub fn record_activity(&mut self, now_ms: u64) -> Activity {
        self.last_activity_ms = now_ms;
        if self.sleeping {
            self.sleeping = false;
            Activity::WokeUp
        } else {
            Activity::Awake
        }
    }

    /// Check the idle time; returns true exactly when the panel should
    /// go to sleep now
    pub fn check(&mut self, now_ms: u64) -> bool {
        if self.sleeping {
            return false;
        }
        if now_ms.saturating_sub(self.last_activity_ms) >= self.timeout_ms {
            self.sleeping = true;
            return true;
        }
        false
    }

    /// Sleep immediately
    pub fn force_sleep(&mut self) {
        self.sleeping = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleeps_after_timeout() {
        let mut t = SleepTimer::new(INACTIVITY_TIMEOUT_MS, 0);
        assert!(!t.check(59_999));
        assert!(t.check(60_000));
        assert!(t.is_sleeping());
        // Only reported once
        assert!(!t.check(70_000));
    }

    #[test]
    fn test_activity_defers_sleep() {
        let mut t = SleepTimer::new(1_000, 0);
        assert_eq!(t.record_activity(900), Activity::Awake);
        assert!(!t.check(1_500));
        assert!(t.check(1_900));
    }

    #[test]
    fn test_wake_reported_once() {
        let mut t = SleepTimer::new(1_000, 0);
        t.force_sleep();
        assert_eq!(t.record_activity(5_000), Activity::WokeUp);
        assert_eq!(t.record_activity(5_001), Activity::Awake);
        assert!(!t.is_sleeping());
    }
}
