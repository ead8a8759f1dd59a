use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatlock_core::{ReservationError, ReservationErrorKind};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Reservation(ReservationError),
    ValidationError(String),
}

impl AppError {
    fn status(kind: ReservationErrorKind) -> StatusCode {
        match kind {
            ReservationErrorKind::NotFound => StatusCode::NOT_FOUND,
            ReservationErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ReservationErrorKind::NotLockOwner => StatusCode::FORBIDDEN,
            ReservationErrorKind::AlreadyLocked
            | ReservationErrorKind::AlreadyBooked
            | ReservationErrorKind::LockExpiredOrMissing
            | ReservationErrorKind::NothingToRelease => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error_message) = match self {
            AppError::Reservation(err) => {
                let kind = err.kind();
                (Self::status(kind), kind.code(), err.to_string())
            }
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ReservationErrorKind::InvalidRequest.code(),
                msg,
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        Self::Reservation(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}
