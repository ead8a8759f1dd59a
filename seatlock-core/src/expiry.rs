use chrono::{DateTime, Duration, Utc};

use crate::seat::SeatState;

pub const DEFAULT_LOCK_DURATION_MS: u64 = 60_000;

/// Longest lock duration accepted from configuration: one day.
pub const MAX_LOCK_DURATION_MS: u64 = 86_400_000;

/// Decides when an unconfirmed lock lapses.
///
/// Pure rule only: enforcement happens in the coordinator, lazily on every
/// touch of a seat and optionally through a periodic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockExpiryPolicy {
    lock_duration: Duration,
}

impl LockExpiryPolicy {
    pub fn new(lock_duration: Duration) -> Self {
        Self { lock_duration }
    }

    /// Values beyond what `Duration` can hold saturate to `Duration::MAX`,
    /// which makes locks effectively permanent rather than instantly stale.
    pub fn from_millis(lock_duration_ms: u64) -> Self {
        let lock_duration = i64::try_from(lock_duration_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or(Duration::MAX);
        Self::new(lock_duration)
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }

    /// A lock taken at `since` is expired from `since + duration` onwards.
    /// A deadline past the end of representable time never arrives.
    pub fn is_expired(&self, state: &SeatState, now: DateTime<Utc>) -> bool {
        self.expires_at(state).is_some_and(|deadline| now >= deadline)
    }

    pub fn expires_at(&self, state: &SeatState) -> Option<DateTime<Utc>> {
        state
            .locked_at()
            .and_then(|since| since.checked_add_signed(self.lock_duration))
    }

    /// The state an observer should see at `now`
    pub fn normalize(&self, state: &SeatState, now: DateTime<Utc>) -> SeatState {
        if self.is_expired(state, now) {
            SeatState::Available
        } else {
            state.clone()
        }
    }
}

impl Default for LockExpiryPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_LOCK_DURATION_MS)
    }
}

pub fn is_expired(state: &SeatState, now: DateTime<Utc>, lock_duration_ms: u64) -> bool {
    LockExpiryPolicy::from_millis(lock_duration_ms).is_expired(state, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_expires_at_boundary() {
        let t0 = Utc::now();
        let state = SeatState::locked("u1", t0);
        let policy = LockExpiryPolicy::from_millis(60_000);

        assert!(!policy.is_expired(&state, t0));
        assert!(!policy.is_expired(&state, t0 + Duration::milliseconds(59_999)));
        assert!(policy.is_expired(&state, t0 + Duration::milliseconds(60_000)));
        assert!(policy.is_expired(&state, t0 + Duration::minutes(5)));
        assert_eq!(policy.expires_at(&state), Some(t0 + Duration::seconds(60)));
    }

    #[test]
    fn test_only_locks_expire() {
        let far_future = Utc::now() + Duration::days(365);
        let booked = SeatState::Booked { holder: "u1".to_string() };

        assert!(!is_expired(&SeatState::Available, far_future, 1));
        assert!(!is_expired(&booked, far_future, 1));
        assert_eq!(LockExpiryPolicy::default().expires_at(&booked), None);
    }

    #[test]
    fn test_oversized_duration_never_expires() {
        let t0 = Utc::now();
        let state = SeatState::locked("u1", t0);

        for ms in [u64::MAX, i64::MAX as u64, 9_000_000_000_000_000_000] {
            let policy = LockExpiryPolicy::from_millis(ms);
            assert!(policy.lock_duration() > Duration::zero());
            assert!(!policy.is_expired(&state, t0));
            assert!(!policy.is_expired(&state, t0 + Duration::days(365)));
            assert_eq!(policy.expires_at(&state), None);
        }
    }

    #[test]
    fn test_max_duration_has_a_deadline() {
        let t0 = Utc::now();
        let state = SeatState::locked("u1", t0);
        let policy = LockExpiryPolicy::from_millis(MAX_LOCK_DURATION_MS);

        assert_eq!(policy.expires_at(&state), Some(t0 + Duration::days(1)));
        assert!(!policy.is_expired(&state, t0 + Duration::hours(23)));
        assert!(policy.is_expired(&state, t0 + Duration::days(1)));
    }

    #[test]
    fn test_normalize() {
        let t0 = Utc::now();
        let state = SeatState::locked("u1", t0);
        let policy = LockExpiryPolicy::from_millis(1_000);

        assert_eq!(policy.normalize(&state, t0), state);
        assert_eq!(policy.normalize(&state, t0 + Duration::seconds(1)), SeatState::Available);
    }
}
