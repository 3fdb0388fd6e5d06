// ── Rooms ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::RoomId;

/// Operational status of a physical room.
///
/// Mutated only by the side-effect dispatcher in response to
/// reservation status changes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Reserved,
    Occupied,
    Cleaning,
    OutOfOrder,
}

/// Cached occupancy interval for a room's current booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookingWindow {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

/// A physical room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    pub room_type: String,
    pub status: RoomStatus,
    /// Interval cache for the booking currently holding the room.
    pub current_booking: Option<BookingWindow>,
}

impl Room {
    pub fn new(number: impl Into<String>, room_type: impl Into<String>) -> Self {
        Self {
            id: RoomId::new(),
            number: number.into(),
            room_type: room_type.into(),
            status: RoomStatus::Available,
            current_booking: None,
        }
    }

    /// Whether this room may be offered to a new booking at all.
    /// Rooms mid-clean are assignable; out-of-order ones are not.
    pub fn is_assignable(&self) -> bool {
        matches!(self.status, RoomStatus::Available | RoomStatus::Cleaning)
    }
}
