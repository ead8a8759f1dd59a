pub mod clock;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod expiry;
pub mod query;
pub mod registry;
pub mod repository;
pub mod seat;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::ReservationCoordinator;
pub use error::{ReservationError, ReservationErrorKind, ReservationResult};
pub use events::{NoopEventSink, SeatEvent, SeatEventKind, SeatEventSink};
pub use expiry::{is_expired, LockExpiryPolicy, DEFAULT_LOCK_DURATION_MS, MAX_LOCK_DURATION_MS};
pub use query::{summarize, SeatSummary};
pub use registry::InMemorySeatRegistry;
pub use repository::{RegistryError, SeatRepository};
pub use seat::{seat_catalog, validate_catalog, CatalogError, MAX_CATALOG_SEATS, Seat, SeatState, SeatStatus, SeatView};
