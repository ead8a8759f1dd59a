use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatEventKind {
    Locked,
    Confirmed,
    Released,
    Expired,
}

impl SeatEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatEventKind::Locked => "locked",
            SeatEventKind::Confirmed => "confirmed",
            SeatEventKind::Released => "released",
            SeatEventKind::Expired => "expired",
        }
    }
}

/// Emitted for every successful seat transition.
///
/// Events are published after the commit, so two transitions of the same seat
/// made by different callers can reach a sink out of order. `version` is the
/// seat version the transition produced; it is strictly increasing per seat
/// and restores commit order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeatEvent {
    pub seat_id: String,
    pub version: u64,
    pub kind: SeatEventKind,
    pub holder: Option<String>,
    pub at: DateTime<Utc>,
}

impl SeatEvent {
    pub fn new(
        seat_id: &str,
        version: u64,
        kind: SeatEventKind,
        holder: Option<&str>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            seat_id: seat_id.to_string(),
            version,
            kind,
            holder: holder.map(str::to_string),
            at,
        }
    }
}

/// Receives seat transitions as the coordinator commits them
pub trait SeatEventSink: Send + Sync {
    fn publish(&self, event: SeatEvent);
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl SeatEventSink for NoopEventSink {
    fn publish(&self, _event: SeatEvent) {}
}
