use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;

use crate::repository::{RegistryError, SeatRepository};
use crate::seat::{validate_catalog, CatalogError, Seat, SeatState};

struct SeatSlot {
    id: String,
    state: Mutex<Versioned>,
}

struct Versioned {
    state: SeatState,
    version: u64,
}

impl SeatSlot {
    fn seat(&self, current: &Versioned) -> Seat {
        Seat {
            id: self.id.clone(),
            state: current.state.clone(),
            version: current.version,
        }
    }
}

/// In-process seat registry with one mutex per seat.
///
/// The catalog is fixed at construction. Single-seat operations hold exactly
/// one slot mutex for the duration of a read-validate-write and never across a
/// suspension point, so operations on different seats never contend.
///
/// Every successful transition bumps the seat's version by one.
///
/// `snapshot` acquires every slot mutex in catalog order before copying, which
/// yields a point-in-time consistent view. The order is fixed and every other
/// operation holds at most one slot, so this cannot deadlock.
pub struct InMemorySeatRegistry {
    slots: Vec<SeatSlot>,
    index: HashMap<String, usize>,
}

impl InMemorySeatRegistry {
    /// Build a registry with every catalog seat available
    pub fn new<I, S>(catalog: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = validate_catalog(catalog)?;

        let index = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();

        let slots = ids
            .into_iter()
            .map(|id| SeatSlot {
                id,
                state: Mutex::new(Versioned {
                    state: SeatState::Available,
                    version: 0,
                }),
            })
            .collect();

        Ok(Self { slots, index })
    }

    fn slot(&self, seat_id: &str) -> Result<&SeatSlot, RegistryError> {
        self.index
            .get(seat_id)
            .map(|&position| &self.slots[position])
            .ok_or_else(|| RegistryError::NotFound(seat_id.to_string()))
    }
}

impl SeatRepository for InMemorySeatRegistry {
    fn get(&self, seat_id: &str) -> Result<Seat, RegistryError> {
        let slot = self.slot(seat_id)?;
        let current = slot.state.lock();
        Ok(slot.seat(&current))
    }

    fn compare_and_transition(
        &self,
        seat_id: &str,
        expected: &SeatState,
        next: SeatState,
    ) -> Result<Seat, RegistryError> {
        let slot = self.slot(seat_id)?;
        let mut current = slot.state.lock();

        if current.state != *expected {
            return Err(RegistryError::Conflict {
                current: slot.seat(&current),
            });
        }

        current.state = next;
        current.version += 1;
        Ok(slot.seat(&current))
    }

    fn snapshot(&self) -> Vec<Seat> {
        let guards: Vec<MutexGuard<'_, Versioned>> =
            self.slots.iter().map(|slot| slot.state.lock()).collect();

        self.slots
            .iter()
            .zip(guards.iter())
            .map(|(slot, current)| slot.seat(current))
            .collect()
    }

    fn contains(&self, seat_id: &str) -> bool {
        self.index.contains_key(seat_id)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}
