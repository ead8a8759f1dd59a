use std::sync::Arc;
use std::time::Duration;
use seatlock_core::ReservationCoordinator;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically return lapsed locks to available so passive observers
/// (the seat list, the event stream) see expiry within one interval.
/// Lazy expiry inside the coordinator stays authoritative either way.
pub fn start_expiry_sweeper(coordinator: Arc<ReservationCoordinator>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Expiry sweeper started, interval {:?}", every);

        loop {
            ticker.tick().await;

            let released = coordinator.sweep_expired();
            if released.is_empty() {
                continue;
            }

            for seat in &released {
                debug!(seat_id = %seat.id, "Expired lock released");
            }
            info!("Expiry sweep released {} seat(s)", released.len());
        }
    })
}
