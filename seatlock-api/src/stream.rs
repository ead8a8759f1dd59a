//! Server-sent events for seat transitions.
//!
//! GET /v1/seats/stream
//!
//! Every committed transition (lock, confirm, release, lazy or swept expiry)
//! is pushed to subscribers, named after the event kind. Slow subscribers that
//! fall behind the channel get a `lagged` event with the number of missed
//! transitions and should re-read `/v1/seats`.
//!
//! Events are sent after the transition commits, so frames for one seat may
//! arrive out of commit order when a request and the sweeper (or two requests)
//! touch it at the same time: `locked` for the new holder can precede `expired`
//! for the old one. Each payload carries the seat `version` that transition
//! produced. Clients keep the highest version seen per seat and drop anything
//! older; `/v1/seats` reports the same version for reconciliation.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream, StreamExt};
use seatlock_core::{SeatEvent, SeatEventSink};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::state::AppState;

/// Forwards coordinator events onto the broadcast channel
pub struct BroadcastSink {
    tx: broadcast::Sender<SeatEvent>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<SeatEvent>) -> Self {
        Self { tx }
    }
}

impl SeatEventSink for BroadcastSink {
    fn publish(&self, event: SeatEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

pub async fn seat_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.seat_events.subscribe();

    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => Event::default()
                .event(event.kind.as_str())
                .json_data(&event)
                .ok()
                .map(Ok),
            Err(BroadcastStreamRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Seat event subscriber lagged");
                Event::default()
                    .event("lagged")
                    .json_data(serde_json::json!({ "missed": missed }))
                    .ok()
                    .map(Ok)
            }
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use seatlock_core::SeatEventKind;

    #[tokio::test]
    async fn test_sink_forwards_to_subscribers() {
        let (tx, mut rx) = broadcast::channel(4);
        let sink = BroadcastSink::new(tx);

        let event = SeatEvent::new("A1", 1, SeatEventKind::Locked, Some("u1"), Utc::now());
        sink.publish(event.clone());

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[test]
    fn test_sink_without_subscribers() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        BroadcastSink::new(tx).publish(SeatEvent::new("A1", 2, SeatEventKind::Released, None, Utc::now()));
    }
}
