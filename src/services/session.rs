//! The terminal's single login session.
//!
//! Holds at most one authenticated user snapshot plus the inactivity
//! deadline. Expiry is observed on read; the access service is
//! responsible for emitting the `session-expired` audit entry when
//! `take_if_expired` hands back the evicted user.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::db::User;

#[derive(Debug, Clone)]
struct ActiveSession {
    user: User,
    last_activity: Instant,
}

pub struct SessionSlot {
    timeout: Duration,
    inner: Mutex<Option<ActiveSession>>,
}

impl SessionSlot {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            inner: Mutex::new(None),
        }
    }

    /// Replace whatever was signed in with this user, deadline from now.
    pub fn sign_in(&self, user: User) {
        let mut slot = self.guard();
        *slot = Some(ActiveSession {
            user,
            last_activity: Instant::now(),
        });
    }

    /// Clear the slot, returning the user that was signed in, if any.
    pub fn sign_out(&self) -> Option<User> {
        self.guard().take().map(|s| s.user)
    }

    /// If the inactivity deadline has passed, evict and return the user
    /// so the caller can audit the expiry. Otherwise leaves state alone.
    pub fn take_if_expired(&self) -> Option<User> {
        self.take_if_expired_at(Instant::now())
    }

    fn take_if_expired_at(&self, now: Instant) -> Option<User> {
        let mut slot = self.guard();

        let expired = slot
            .as_ref()
            .is_some_and(|s| now.duration_since(s.last_activity) >= self.timeout);

        if expired {
            slot.take().map(|s| s.user)
        } else {
            None
        }
    }

    /// Current user without touching the deadline. Callers wanting
    /// expiry-aware reads go through the access service, which pairs
    /// this with `take_if_expired`.
    pub fn current(&self) -> Option<User> {
        self.guard().as_ref().map(|s| s.user.clone())
    }

    /// Extend the deadline by the configured timeout from now.
    /// No-op while anonymous.
    pub fn touch(&self) {
        let mut slot = self.guard();
        if let Some(session) = slot.as_mut() {
            session.last_activity = Instant::now();
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.guard()
            .as_ref()
            .is_some_and(|s| now.duration_since(s.last_activity) >= self.timeout)
    }

    pub fn is_logged_in(&self) -> bool {
        self.guard().is_some()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Option<ActiveSession>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn test_user(username: &str, role: Role) -> User {
        User {
            id: 7,
            username: username.to_string(),
            role,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn anonymous_by_default() {
        let slot = SessionSlot::new(Duration::from_secs(600));
        assert!(!slot.is_logged_in());
        assert!(slot.current().is_none());
        assert!(slot.take_if_expired().is_none());
    }

    #[test]
    fn sign_in_and_out() {
        let slot = SessionSlot::new(Duration::from_secs(600));
        slot.sign_in(test_user("ana", Role::Seller));

        assert!(slot.is_logged_in());
        assert_eq!(slot.current().unwrap().username, "ana");

        let evicted = slot.sign_out().unwrap();
        assert_eq!(evicted.username, "ana");
        assert!(!slot.is_logged_in());
    }

    #[test]
    fn touch_while_anonymous_is_a_noop() {
        let slot = SessionSlot::new(Duration::from_secs(600));
        slot.touch();
        assert!(!slot.is_logged_in());
    }

    #[test]
    fn expiry_evicts_and_returns_the_user() {
        let slot = SessionSlot::new(Duration::from_millis(0));
        slot.sign_in(test_user("ana", Role::Admin));

        let evicted = slot.take_if_expired().unwrap();
        assert_eq!(evicted.username, "ana");
        assert!(!slot.is_logged_in());
        // A second read finds nothing to evict.
        assert!(slot.take_if_expired().is_none());
    }

    #[test]
    fn touch_extends_the_deadline() {
        let slot = SessionSlot::new(Duration::from_secs(600));
        slot.sign_in(test_user("ana", Role::Admin));

        slot.touch();
        assert!(!slot.is_expired());
        assert!(slot.take_if_expired().is_none());
        assert!(slot.is_logged_in());
    }
}
