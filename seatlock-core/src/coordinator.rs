use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{ReservationError, ReservationResult};
use crate::events::{NoopEventSink, SeatEvent, SeatEventKind, SeatEventSink};
use crate::expiry::LockExpiryPolicy;
use crate::repository::{RegistryError, SeatRepository};
use crate::seat::{Seat, SeatState, SeatView};

/// Orchestrates lock / confirm / release against the seat registry.
///
/// Each operation reads the seat, applies lazy expiry, validates ownership and
/// commits through a single `compare_and_transition`. If that commit loses a
/// race, the operation re-evaluates against the state that won, so every
/// outcome matches the registry's linearized order. Nothing waits on another
/// caller: an operation either commits or fails with a specific error.
pub struct ReservationCoordinator {
    registry: Arc<dyn SeatRepository>,
    policy: LockExpiryPolicy,
    clock: Arc<dyn Clock>,
    events: Arc<dyn SeatEventSink>,
}

impl ReservationCoordinator {
    pub fn new(registry: Arc<dyn SeatRepository>, policy: LockExpiryPolicy) -> Self {
        Self {
            registry,
            policy,
            clock: Arc::new(SystemClock),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn SeatEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn policy(&self) -> &LockExpiryPolicy {
        &self.policy
    }

    /// Available -> Locked for `user_id`
    pub fn lock(&self, seat_id: &str, user_id: &str) -> ReservationResult<Seat> {
        let mut seat = self.fetch(seat_id)?;
        let user_id = require_user(user_id)?;

        loop {
            let now = self.clock.now();
            match self.observe(&seat, now) {
                SeatState::Available => {
                    let next = SeatState::locked(user_id, now);
                    match self.commit(seat_id, &SeatState::Available, next)? {
                        Ok(locked) => {
                            self.publish(&locked, SeatEventKind::Locked, Some(user_id), now);
                            return Ok(locked);
                        }
                        Err(current) => seat = current,
                    }
                }
                SeatState::Locked { .. } => {
                    return Err(ReservationError::AlreadyLocked { seat_id: seat.id });
                }
                SeatState::Booked { .. } => {
                    return Err(ReservationError::AlreadyBooked { seat_id: seat.id });
                }
            }
        }
    }

    /// Locked -> Booked, holder only
    pub fn confirm(&self, seat_id: &str, user_id: &str) -> ReservationResult<Seat> {
        let mut seat = self.fetch(seat_id)?;
        let user_id = require_user(user_id)?;

        loop {
            let now = self.clock.now();
            match self.observe(&seat, now) {
                SeatState::Locked { holder, .. } if holder == user_id => {
                    let next = SeatState::Booked { holder };
                    match self.commit(seat_id, &seat.state, next)? {
                        Ok(booked) => {
                            self.publish(&booked, SeatEventKind::Confirmed, Some(user_id), now);
                            return Ok(booked);
                        }
                        Err(current) => seat = current,
                    }
                }
                SeatState::Locked { .. } => {
                    return Err(ReservationError::NotLockOwner { seat_id: seat.id });
                }
                SeatState::Available => {
                    return Err(ReservationError::LockExpiredOrMissing { seat_id: seat.id });
                }
                SeatState::Booked { .. } => {
                    return Err(ReservationError::AlreadyBooked { seat_id: seat.id });
                }
            }
        }
    }

    /// Locked -> Available, holder only
    pub fn release(&self, seat_id: &str, user_id: &str) -> ReservationResult<Seat> {
        let mut seat = self.fetch(seat_id)?;
        let user_id = require_user(user_id)?;

        loop {
            let now = self.clock.now();
            match self.observe(&seat, now) {
                SeatState::Locked { holder, .. } if holder == user_id => {
                    match self.commit(seat_id, &seat.state, SeatState::Available)? {
                        Ok(released) => {
                            self.publish(&released, SeatEventKind::Released, Some(user_id), now);
                            return Ok(released);
                        }
                        Err(current) => seat = current,
                    }
                }
                SeatState::Locked { .. } => {
                    return Err(ReservationError::NotLockOwner { seat_id: seat.id });
                }
                SeatState::Available | SeatState::Booked { .. } => {
                    return Err(ReservationError::NothingToRelease { seat_id: seat.id });
                }
            }
        }
    }

    /// One seat as an observer should see it
    pub fn get_seat(&self, seat_id: &str) -> ReservationResult<Seat> {
        let seat = self.fetch(seat_id)?;
        let state = self.observe(&seat, self.clock.now());
        Ok(Seat { state, ..seat })
    }

    /// Consistent listing of every seat. Locks that have lapsed are reported
    /// (and written back) as available.
    pub fn list_seats(&self) -> Vec<SeatView> {
        let now = self.clock.now();
        self.registry
            .snapshot()
            .into_iter()
            .map(|seat| {
                let state = self.observe(&seat, now);
                self.view(&Seat { state, ..seat })
            })
            .collect()
    }

    /// Return every lapsed lock to available; yields the seats released.
    pub fn sweep_expired(&self) -> Vec<Seat> {
        let now = self.clock.now();
        self.registry
            .snapshot()
            .into_iter()
            .filter(|seat| self.policy.is_expired(&seat.state, now))
            .filter_map(|seat| self.expire(&seat, now))
            .collect()
    }

    pub fn view(&self, seat: &Seat) -> SeatView {
        SeatView::from_seat(seat, &self.policy)
    }

    fn fetch(&self, seat_id: &str) -> ReservationResult<Seat> {
        self.registry
            .get(seat_id)
            .map_err(|_| ReservationError::not_found(seat_id))
    }

    /// Lazy expiry: a lapsed lock is observed as available and written back.
    fn observe(&self, seat: &Seat, now: DateTime<Utc>) -> SeatState {
        if self.policy.is_expired(&seat.state, now) {
            self.expire(seat, now);
            SeatState::Available
        } else {
            seat.state.clone()
        }
    }

    fn expire(&self, seat: &Seat, now: DateTime<Utc>) -> Option<Seat> {
        let released = self
            .registry
            .compare_and_transition(&seat.id, &seat.state, SeatState::Available)
            .ok()?;
        self.publish(&released, SeatEventKind::Expired, seat.holder(), now);
        Some(released)
    }

    /// Outer error: the seat vanished. Inner error: lost the race, with the
    /// state that won.
    fn commit(
        &self,
        seat_id: &str,
        expected: &SeatState,
        next: SeatState,
    ) -> ReservationResult<Result<Seat, Seat>> {
        match self.registry.compare_and_transition(seat_id, expected, next) {
            Ok(seat) => Ok(Ok(seat)),
            Err(RegistryError::Conflict { current }) => Ok(Err(current)),
            Err(RegistryError::NotFound(_)) => Err(ReservationError::not_found(seat_id)),
        }
    }

    /// `seat` is the result of the commit, so the event carries its new version
    fn publish(&self, seat: &Seat, kind: SeatEventKind, holder: Option<&str>, at: DateTime<Utc>) {
        self.events
            .publish(SeatEvent::new(&seat.id, seat.version, kind, holder, at));
    }
}

fn require_user(user_id: &str) -> ReservationResult<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ReservationError::InvalidRequest {
            reason: "user_id is required".to_string(),
        });
    }
    Ok(user_id)
}
