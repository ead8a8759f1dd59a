use crate::seat::{Seat, SeatState};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Seat not found: {0}")]
    NotFound(String),

    #[error("Seat changed concurrently: {current:?}")]
    Conflict { current: Seat },
}

/// Authoritative store of seat state.
///
/// `compare_and_transition` is the only way to mutate a seat. Implementations
/// must apply it atomically per seat: two callers expecting the same state can
/// never both succeed.
pub trait SeatRepository: Send + Sync {
    fn get(&self, seat_id: &str) -> Result<Seat, RegistryError>;

    /// Replace the seat's state with `next` iff it currently equals `expected`.
    /// On mismatch nothing changes and the current seat comes back in
    /// `RegistryError::Conflict`.
    fn compare_and_transition(
        &self,
        seat_id: &str,
        expected: &SeatState,
        next: SeatState,
    ) -> Result<Seat, RegistryError>;

    /// Every seat in catalog order
    fn snapshot(&self) -> Vec<Seat>;

    fn contains(&self, seat_id: &str) -> bool {
        self.get(seat_id).is_ok()
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
