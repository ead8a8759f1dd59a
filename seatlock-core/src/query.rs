use serde::{Deserialize, Serialize};

use crate::expiry::LockExpiryPolicy;
use crate::seat::{Seat, SeatStatus, SeatView};

impl SeatView {
    pub fn from_seat(seat: &Seat, policy: &LockExpiryPolicy) -> Self {
        Self {
            id: seat.id.clone(),
            status: seat.status(),
            holder: seat.holder().map(str::to_string),
            locked_at: seat.state.locked_at(),
            expires_at: policy.expires_at(&seat.state),
            version: seat.version,
        }
    }
}

/// Seat counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub total: usize,
    pub available: usize,
    pub locked: usize,
    pub booked: usize,
}

pub fn summarize(seats: &[SeatView]) -> SeatSummary {
    seats.iter().fold(SeatSummary::default(), |mut acc, seat| {
        acc.total += 1;
        match seat.status {
            SeatStatus::Available => acc.available += 1,
            SeatStatus::Locked => acc.locked += 1,
            SeatStatus::Booked => acc.booked += 1,
        }
        acc
    })
}
