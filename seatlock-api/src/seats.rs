use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use seatlock_core::{summarize, ReservationResult, Seat, SeatSummary, SeatView};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{error::AppError, state::AppState, stream};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SeatActionRequest {
    /// Absent and blank ids are both rejected by the coordinator as invalid
    #[serde(default)]
    pub user_id: Option<String>,
}

impl SeatActionRequest {
    fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/seats", get(list_seats))
        .route("/v1/seats/summary", get(seat_summary))
        .route("/v1/seats/stream", get(stream::seat_stream))
        .route("/v1/seats/{seat_id}", get(get_seat))
        .route("/v1/seats/{seat_id}/lock", post(lock_seat))
        .route("/v1/seats/{seat_id}/confirm", post(confirm_seat))
        .route("/v1/seats/{seat_id}/release", post(release_seat))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/seats
async fn list_seats(State(state): State<AppState>) -> Json<Vec<SeatView>> {
    Json(state.coordinator.list_seats())
}

/// GET /v1/seats/summary
async fn seat_summary(State(state): State<AppState>) -> Json<SeatSummary> {
    Json(summarize(&state.coordinator.list_seats()))
}

/// GET /v1/seats/{seat_id}
async fn get_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<Json<SeatView>, AppError> {
    let seat = state.coordinator.get_seat(&seat_id)?;
    Ok(Json(state.coordinator.view(&seat)))
}

/// POST /v1/seats/{seat_id}/lock
async fn lock_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<SeatActionRequest>, JsonRejection>,
) -> Result<Json<SeatView>, AppError> {
    let Json(req) = body?;
    let result = state.coordinator.lock(&seat_id, req.user_id());
    respond(&state, "lock", &seat_id, req.user_id(), result)
}

/// POST /v1/seats/{seat_id}/confirm
async fn confirm_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<SeatActionRequest>, JsonRejection>,
) -> Result<Json<SeatView>, AppError> {
    let Json(req) = body?;
    let result = state.coordinator.confirm(&seat_id, req.user_id());
    respond(&state, "confirm", &seat_id, req.user_id(), result)
}

/// POST /v1/seats/{seat_id}/release
async fn release_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    body: Result<Json<SeatActionRequest>, JsonRejection>,
) -> Result<Json<SeatView>, AppError> {
    let Json(req) = body?;
    let result = state.coordinator.release(&seat_id, req.user_id());
    respond(&state, "release", &seat_id, req.user_id(), result)
}

fn respond(
    state: &AppState,
    action: &'static str,
    seat_id: &str,
    user_id: &str,
    result: ReservationResult<Seat>,
) -> Result<Json<SeatView>, AppError> {
    match result {
        Ok(seat) => {
            info!(action, seat_id, user_id, status = %seat.status(), "Seat transition committed");
            Ok(Json(state.coordinator.view(&seat)))
        }
        Err(err) => {
            debug!(action, seat_id, user_id, code = err.kind().code(), "Seat request rejected");
            Err(err.into())
        }
    }
}
