//! In-memory brute-force lockout tracking.
//!
//! State is scoped to the process lifetime on purpose: restarting the
//! terminal clears all lockouts. Expiry is computed lazily on read, so
//! there is no background sweeper thread.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone)]
struct LockoutRecord {
    failed_count: u32,
    locked_until: Option<Instant>,
}

pub struct LockoutTracker {
    max_attempts: u32,
    lockout_duration: Duration,
    records: Mutex<HashMap<String, LockoutRecord>>,
}

impl LockoutTracker {
    #[must_use]
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout_duration,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Record the outcome of an authentication attempt.
    ///
    /// A success resets the counter unconditionally. A failure increments
    /// it; reaching the maximum sets the lock expiry once and further
    /// failures do not extend it.
    pub fn record_attempt(&self, username: &str, succeeded: bool) {
        self.record_attempt_at(username, succeeded, Instant::now());
    }

    fn record_attempt_at(&self, username: &str, succeeded: bool, now: Instant) {
        let mut records = self.guard();

        if succeeded {
            records.remove(username);
            return;
        }

        let record = records
            .entry(username.to_string())
            .or_insert_with(|| LockoutRecord {
                failed_count: 0,
                locked_until: None,
            });

        // An expired lock starts a fresh count rather than re-locking
        // on the first failure after it elapses.
        if let Some(until) = record.locked_until
            && now >= until
        {
            record.failed_count = 0;
            record.locked_until = None;
        }

        if record.locked_until.is_some() {
            return;
        }

        record.failed_count += 1;

        if record.failed_count >= self.max_attempts {
            record.locked_until = Some(now + self.lockout_duration);
            warn!(username, "Account locked after repeated failed logins");
        }
    }

    /// Whether the username is currently locked. Reads mutate: an expired
    /// lock transitions back to zero-count, unlocked.
    pub fn is_locked(&self, username: &str) -> bool {
        self.is_locked_at(username, Instant::now())
    }

    fn is_locked_at(&self, username: &str, now: Instant) -> bool {
        let mut records = self.guard();

        let Some(record) = records.get_mut(username) else {
            return false;
        };

        match record.locked_until {
            Some(until) if now >= until => {
                records.remove(username);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Attempts left before lockout. Zero while locked.
    pub fn remaining_attempts(&self, username: &str) -> u32 {
        self.remaining_attempts_at(username, Instant::now())
    }

    fn remaining_attempts_at(&self, username: &str, now: Instant) -> u32 {
        if self.is_locked_at(username, now) {
            return 0;
        }

        let records = self.guard();
        let failed = records.get(username).map_or(0, |r| r.failed_count);
        self.max_attempts.saturating_sub(failed)
    }

    /// Seconds until the lock clears, zero when not locked.
    pub fn remaining_lock_seconds(&self, username: &str) -> u64 {
        self.remaining_lock_seconds_at(username, Instant::now())
    }

    fn remaining_lock_seconds_at(&self, username: &str, now: Instant) -> u64 {
        let records = self.guard();

        records
            .get(username)
            .and_then(|r| r.locked_until)
            .map_or(0, |until| {
                until.saturating_duration_since(now).as_secs()
            })
    }

    /// Forget everything about a username.
    pub fn reset(&self, username: &str) {
        self.guard().remove(username);
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, HashMap<String, LockoutRecord>> {
        // A poisoned map only means a panic happened mid-update; the data
        // is still a valid HashMap, so recover it rather than propagate.
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: Duration = Duration::from_secs(300);

    #[test]
    fn unknown_username_is_not_locked() {
        let tracker = LockoutTracker::new(3, LOCK);
        assert!(!tracker.is_locked("nobody"));
        assert_eq!(tracker.remaining_attempts("nobody"), 3);
        assert_eq!(tracker.remaining_lock_seconds("nobody"), 0);
    }

    #[test]
    fn locks_after_max_attempts() {
        let tracker = LockoutTracker::new(3, LOCK);
        let now = Instant::now();

        tracker.record_attempt_at("ana", false, now);
        assert!(!tracker.is_locked_at("ana", now));
        assert_eq!(tracker.remaining_attempts_at("ana", now), 2);

        tracker.record_attempt_at("ana", false, now);
        assert!(!tracker.is_locked_at("ana", now));

        tracker.record_attempt_at("ana", false, now);
        assert!(tracker.is_locked_at("ana", now));
        assert_eq!(tracker.remaining_attempts_at("ana", now), 0);
        assert_eq!(tracker.remaining_lock_seconds_at("ana", now), 300);
    }

    #[test]
    fn further_failures_do_not_extend_the_lock() {
        let tracker = LockoutTracker::new(3, LOCK);
        let now = Instant::now();

        for _ in 0..3 {
            tracker.record_attempt_at("ana", false, now);
        }
        let later = now + Duration::from_secs(100);
        tracker.record_attempt_at("ana", false, later);

        assert_eq!(tracker.remaining_lock_seconds_at("ana", later), 200);
    }

    #[test]
    fn expired_lock_clears_on_read_and_count_restarts() {
        let tracker = LockoutTracker::new(3, LOCK);
        let now = Instant::now();

        for _ in 0..3 {
            tracker.record_attempt_at("ana", false, now);
        }
        assert!(tracker.is_locked_at("ana", now));

        let after = now + LOCK + Duration::from_secs(1);
        assert!(!tracker.is_locked_at("ana", after));
        assert_eq!(tracker.remaining_attempts_at("ana", after), 3);

        // One new failure does not immediately re-lock.
        tracker.record_attempt_at("ana", false, after);
        assert!(!tracker.is_locked_at("ana", after));
        assert_eq!(tracker.remaining_attempts_at("ana", after), 2);
    }

    #[test]
    fn success_resets_regardless_of_prior_failures() {
        let tracker = LockoutTracker::new(3, LOCK);
        let now = Instant::now();

        tracker.record_attempt_at("ana", false, now);
        tracker.record_attempt_at("ana", false, now);
        tracker.record_attempt_at("ana", true, now);

        assert!(!tracker.is_locked_at("ana", now));
        assert_eq!(tracker.remaining_attempts_at("ana", now), 3);
    }

    #[test]
    fn usernames_are_tracked_independently() {
        let tracker = LockoutTracker::new(2, LOCK);
        let now = Instant::now();

        tracker.record_attempt_at("ana", false, now);
        tracker.record_attempt_at("ana", false, now);
        tracker.record_attempt_at("bo", false, now);

        assert!(tracker.is_locked_at("ana", now));
        assert!(!tracker.is_locked_at("bo", now));
    }

    #[test]
    fn reset_clears_an_active_lock() {
        let tracker = LockoutTracker::new(1, LOCK);
        let now = Instant::now();

        tracker.record_attempt_at("ana", false, now);
        assert!(tracker.is_locked_at("ana", now));

        tracker.reset("ana");
        assert!(!tracker.is_locked_at("ana", now));
        assert_eq!(tracker.remaining_attempts_at("ana", now), 1);
    }
}
