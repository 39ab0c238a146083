//! The terminal-wide cooldown window.
//!
//! A single window shared by all drawers. Expiry is computed on read;
//! no callback thread ever fires. Role gating for who may arm, clear,
//! or reconfigure the timer lives in `domain::Role::allows`, not here.

use serde::Serialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct BlockWindow {
    enabled: bool,
    blocked_until: Option<Instant>,
}

/// Snapshot for the status poll.
#[derive(Debug, Clone, Serialize)]
pub struct TimerStatus {
    pub enabled: bool,
    pub blocked: bool,
    pub remaining_seconds: u64,
}

/// Upper bound on a single window. Instant arithmetic overflows on
/// absurd durations, so anything longer is clamped here.
const MAX_WINDOW: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub struct BlockTimer {
    window: Mutex<BlockWindow>,
}

impl BlockTimer {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            window: Mutex::new(BlockWindow {
                enabled,
                blocked_until: None,
            }),
        }
    }

    /// Whether the window currently suspends drawer operations.
    /// Always false while disabled, whatever instant is stored.
    pub fn is_blocked(&self) -> bool {
        self.is_blocked_at(Instant::now())
    }

    fn is_blocked_at(&self, now: Instant) -> bool {
        let mut window = self.guard();

        if !window.enabled {
            return false;
        }

        match window.blocked_until {
            Some(until) if now >= until => {
                window.blocked_until = None;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Seconds left in the window, zero when not blocking.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds_at(Instant::now())
    }

    fn remaining_seconds_at(&self, now: Instant) -> u64 {
        if !self.is_blocked_at(now) {
            return 0;
        }

        let window = self.guard();
        window
            .blocked_until
            .map_or(0, |until| until.saturating_duration_since(now).as_secs())
    }

    /// Arm the window. Fails (returns false) while the timer is disabled.
    pub fn block_for(&self, duration: Duration) -> bool {
        self.block_for_at(duration, Instant::now())
    }

    fn block_for_at(&self, duration: Duration, now: Instant) -> bool {
        let mut window = self.guard();

        if !window.enabled {
            return false;
        }

        window.blocked_until = Some(now + duration.min(MAX_WINDOW));
        true
    }

    pub fn block_for_minutes(&self, minutes: u64) -> bool {
        self.block_for(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Drop any stored window. Returns whether one was present.
    pub fn clear(&self) -> bool {
        let mut window = self.guard();
        window.blocked_until.take().is_some()
    }

    /// Toggle the timer. The stored expiry is preserved, not cleared:
    /// re-enabling resumes the previous expiry check if it has not
    /// elapsed, so disable/enable cannot be used to wipe a block.
    pub fn set_enabled(&self, enabled: bool) {
        self.guard().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.guard().enabled
    }

    pub fn status(&self) -> TimerStatus {
        let now = Instant::now();
        TimerStatus {
            enabled: self.is_enabled(),
            blocked: self.is_blocked_at(now),
            remaining_seconds: self.remaining_seconds_at(now),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, BlockWindow> {
        match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MIN: Duration = Duration::from_secs(300);

    #[test]
    fn starts_idle() {
        let timer = BlockTimer::new(true);
        assert!(timer.is_enabled());
        assert!(!timer.is_blocked());
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn arming_blocks_until_expiry() {
        let timer = BlockTimer::new(true);
        let now = Instant::now();

        assert!(timer.block_for_at(FIVE_MIN, now));
        assert!(timer.is_blocked_at(now));
        assert_eq!(timer.remaining_seconds_at(now), 300);

        let after = now + FIVE_MIN + Duration::from_secs(1);
        assert!(!timer.is_blocked_at(after));
        assert_eq!(timer.remaining_seconds_at(after), 0);
    }

    #[test]
    fn arming_fails_while_disabled() {
        let timer = BlockTimer::new(false);
        assert!(!timer.block_for(FIVE_MIN));
        assert!(!timer.is_blocked());
    }

    #[test]
    fn disabling_hides_an_active_block_but_preserves_it() {
        let timer = BlockTimer::new(true);
        let now = Instant::now();

        assert!(timer.block_for_at(FIVE_MIN, now));
        timer.set_enabled(false);
        assert!(!timer.is_blocked_at(now));

        // Re-enabling before expiry restores the previous window.
        timer.set_enabled(true);
        assert!(timer.is_blocked_at(now));

        // Re-enabling after expiry does not resurrect a stale block.
        timer.set_enabled(false);
        let after = now + FIVE_MIN + Duration::from_secs(1);
        timer.set_enabled(true);
        assert!(!timer.is_blocked_at(after));
    }

    #[test]
    fn absurd_durations_are_clamped_not_overflowed() {
        let timer = BlockTimer::new(true);

        assert!(timer.block_for_minutes(u64::MAX));
        assert!(timer.is_blocked());
        assert!(timer.remaining_seconds() <= MAX_WINDOW.as_secs());
    }

    #[test]
    fn clear_reports_whether_a_window_existed() {
        let timer = BlockTimer::new(true);
        assert!(!timer.clear());

        assert!(timer.block_for(FIVE_MIN));
        assert!(timer.clear());
        assert!(!timer.is_blocked());
    }

    #[test]
    fn status_snapshot_is_consistent() {
        let timer = BlockTimer::new(true);
        timer.block_for(FIVE_MIN);

        let status = timer.status();
        assert!(status.enabled);
        assert!(status.blocked);
        assert!(status.remaining_seconds > 0 && status.remaining_seconds <= 300);
    }
}
