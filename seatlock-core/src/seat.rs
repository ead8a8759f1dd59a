use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seat status as reported to callers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Locked,
    Booked,
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatStatus::Available => write!(f, "AVAILABLE"),
            SeatStatus::Locked => write!(f, "LOCKED"),
            SeatStatus::Booked => write!(f, "BOOKED"),
        }
    }
}

/// Authoritative state of a single seat.
///
/// A holder exists exactly when the seat is locked or booked, and only a
/// locked seat carries the instant its lock was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    Available,
    Locked { holder: String, since: DateTime<Utc> },
    Booked { holder: String },
}

impl SeatState {
    pub fn locked(holder: impl Into<String>, since: DateTime<Utc>) -> Self {
        SeatState::Locked { holder: holder.into(), since }
    }

    pub fn status(&self) -> SeatStatus {
        match self {
            SeatState::Available => SeatStatus::Available,
            SeatState::Locked { .. } => SeatStatus::Locked,
            SeatState::Booked { .. } => SeatStatus::Booked,
        }
    }

    pub fn holder(&self) -> Option<&str> {
        match self {
            SeatState::Available => None,
            SeatState::Locked { holder, .. } | SeatState::Booked { holder } => Some(holder),
        }
    }

    pub fn locked_at(&self) -> Option<DateTime<Utc>> {
        match self {
            SeatState::Locked { since, .. } => Some(*since),
            _ => None,
        }
    }

    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.holder() == Some(user_id)
    }
}

/// A seat from the catalog together with its current state.
///
/// `version` counts committed transitions of this seat, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub state: SeatState,
    #[serde(default)]
    pub version: u64,
}

impl Seat {
    pub fn available(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SeatState::Available,
            version: 0,
        }
    }

    pub fn status(&self) -> SeatStatus {
        self.state.status()
    }

    pub fn holder(&self) -> Option<&str> {
        self.state.holder()
    }
}

/// Flat, caller-facing rendering of a seat (the query surface record)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: String,
    pub status: SeatStatus,
    pub holder: Option<String>,
    pub locked_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub version: u64,
}

/// Largest catalog `seat_catalog` will generate
pub const MAX_CATALOG_SEATS: u64 = 100_000;

/// Generate a rectangular catalog: rows lettered from `A`, seats numbered from 1.
///
/// Rows past `Z` continue as `AA`, `AB`, ...
pub fn seat_catalog(rows: u32, seats_per_row: u32) -> Result<Vec<String>, CatalogError> {
    let total = u64::from(rows) * u64::from(seats_per_row);
    if total > MAX_CATALOG_SEATS {
        return Err(CatalogError::TooLarge { rows, seats_per_row });
    }

    let mut ids = Vec::with_capacity(total as usize);
    for row in 0..rows {
        let label = row_label(row);
        for number in 1..=seats_per_row {
            ids.push(format!("{}{}", label, number));
        }
    }
    Ok(ids)
}

fn row_label(mut row: u32) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (row % 26) as u8);
        if row < 26 {
            break;
        }
        row = row / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Seat catalog is empty")]
    Empty,

    #[error("Seat id must not be blank")]
    BlankId,

    #[error("Duplicate seat id in catalog: {0}")]
    Duplicate(String),

    #[error("Catalog of {rows} x {seats_per_row} seats exceeds {MAX_CATALOG_SEATS}")]
    TooLarge { rows: u32, seats_per_row: u32 },
}

/// Check a catalog before building a registry from it; returns trimmed ids.
pub fn validate_catalog<I, S>(ids: I) -> Result<Vec<String>, CatalogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(CatalogError::BlankId);
        }
        if !seen.insert(id.to_string()) {
            return Err(CatalogError::Duplicate(id.to_string()));
        }
        out.push(id.to_string());
    }

    if out.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_accessors() {
        let now = Utc::now();
        let locked = SeatState::locked("u1", now);
        assert_eq!(locked.status(), SeatStatus::Locked);
        assert_eq!(locked.holder(), Some("u1"));
        assert_eq!(locked.locked_at(), Some(now));

        let booked = SeatState::Booked { holder: "u1".to_string() };
        assert_eq!(booked.holder(), Some("u1"));
        assert_eq!(booked.locked_at(), None);

        assert_eq!(SeatState::Available.holder(), None);
        assert!(!SeatState::Available.is_held_by("u1"));
    }

    #[test]
    fn test_seat_catalog_layout() {
        let ids = seat_catalog(2, 3).unwrap();
        assert_eq!(ids, vec!["A1", "A2", "A3", "B1", "B2", "B3"]);

        let wide = seat_catalog(28, 1).unwrap();
        assert_eq!(wide[25], "Z1");
        assert_eq!(wide[26], "AA1");
        assert_eq!(wide[27], "AB1");
    }

    #[test]
    fn test_seat_catalog_size_limit() {
        // 70000 * 70000 wraps a u32 multiply
        assert_eq!(
            seat_catalog(70_000, 70_000),
            Err(CatalogError::TooLarge { rows: 70_000, seats_per_row: 70_000 })
        );
        assert!(seat_catalog(u32::MAX, u32::MAX).is_err());
        assert!(seat_catalog(1_001, 100).is_err());
        assert_eq!(seat_catalog(1_000, 100).unwrap().len(), 100_000);
        assert_eq!(seat_catalog(0, 10).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_validate_catalog() {
        assert_eq!(validate_catalog([" A1 ", "A2"]).unwrap(), vec!["A1", "A2"]);
        assert_eq!(validate_catalog(["A1", "A1"]), Err(CatalogError::Duplicate("A1".to_string())));
        assert_eq!(validate_catalog(["A1", "  "]), Err(CatalogError::BlankId));
        assert_eq!(validate_catalog(Vec::<String>::new()), Err(CatalogError::Empty));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&SeatStatus::Available).unwrap();
        assert_eq!(json, "\"AVAILABLE\"");
        assert_eq!(SeatStatus::Booked.to_string(), "BOOKED");
    }
}
