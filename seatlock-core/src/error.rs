use serde::{Deserialize, Serialize};

/// Expected, caller-recoverable reservation failures
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Seat not found: {seat_id}")]
    NotFound { seat_id: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Seat {seat_id} is already locked")]
    AlreadyLocked { seat_id: String },

    #[error("Seat {seat_id} is already booked")]
    AlreadyBooked { seat_id: String },

    #[error("Seat {seat_id} is locked by another user")]
    NotLockOwner { seat_id: String },

    #[error("No active lock on seat {seat_id}")]
    LockExpiredOrMissing { seat_id: String },

    #[error("Seat {seat_id} is not locked")]
    NothingToRelease { seat_id: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationErrorKind {
    NotFound,
    InvalidRequest,
    AlreadyLocked,
    AlreadyBooked,
    NotLockOwner,
    LockExpiredOrMissing,
    NothingToRelease,
}

impl ReservationErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::AlreadyLocked => "ALREADY_LOCKED",
            Self::AlreadyBooked => "ALREADY_BOOKED",
            Self::NotLockOwner => "NOT_LOCK_OWNER",
            Self::LockExpiredOrMissing => "LOCK_EXPIRED_OR_MISSING",
            Self::NothingToRelease => "NOTHING_TO_RELEASE",
        }
    }
}

impl std::fmt::Display for ReservationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl ReservationError {
    pub fn kind(&self) -> ReservationErrorKind {
        match self {
            Self::NotFound { .. } => ReservationErrorKind::NotFound,
            Self::InvalidRequest { .. } => ReservationErrorKind::InvalidRequest,
            Self::AlreadyLocked { .. } => ReservationErrorKind::AlreadyLocked,
            Self::AlreadyBooked { .. } => ReservationErrorKind::AlreadyBooked,
            Self::NotLockOwner { .. } => ReservationErrorKind::NotLockOwner,
            Self::LockExpiredOrMissing { .. } => ReservationErrorKind::LockExpiredOrMissing,
            Self::NothingToRelease { .. } => ReservationErrorKind::NothingToRelease,
        }
    }

    pub(crate) fn not_found(seat_id: &str) -> Self {
        Self::NotFound { seat_id: seat_id.to_string() }
    }
}

pub type ReservationResult<T> = Result<T, ReservationError>;
