use std::sync::Arc;
use tokio::sync::broadcast;
use seatlock_core::{Clock, InMemorySeatRegistry, ReservationCoordinator, SeatEvent, SystemClock};

use crate::app_config::{ConfigError, SeatsConfig};
use crate::stream::BroadcastSink;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ReservationCoordinator>,
    pub seat_events: broadcast::Sender<SeatEvent>,
}

impl AppState {
    pub fn new(seats: &SeatsConfig) -> Result<Self, ConfigError> {
        Self::with_clock(seats, Arc::new(SystemClock))
    }

    /// Build the registry and coordinator for the configured catalog
    pub fn with_clock(seats: &SeatsConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let registry = InMemorySeatRegistry::new(seats.catalog_ids()?)?;
        let (seat_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let coordinator = ReservationCoordinator::new(Arc::new(registry), seats.policy())
            .with_clock(clock)
            .with_event_sink(Arc::new(BroadcastSink::new(seat_events.clone())));

        Ok(Self {
            coordinator: Arc::new(coordinator),
            seat_events,
        })
    }
}
