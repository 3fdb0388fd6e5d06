// ── Persisted reservation ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::booking::{BookingStatus, CanonicalBooking};
use super::ids::{ReservationId, RoomId};

/// The internal reservation record.
///
/// Created when reconciliation finds no match for a canonical booking,
/// mutated in place when a match is found. Never physically deleted by
/// this core — cancellation is a status value, not a row removal.
///
/// Invariant: two reservations on the same room whose statuses both
/// block the room never have overlapping `[check_in, check_out)`
/// intervals (half-open).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    /// External identifier at the source, `None` for reservations
    /// created directly by staff.
    pub external_id: Option<String>,
    /// Source name, `None` for directly-created reservations.
    pub source: Option<String>,
    /// Assigned room, `None` while awaiting manual resolution.
    pub room_id: Option<RoomId>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub room_type: String,
    pub room_number: Option<String>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guest_count: u32,
    pub total_amount: f64,
    pub currency: String,
    pub status: BookingStatus,
    pub booked_at: Option<DateTime<Utc>>,
    pub special_requests: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub is_external: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Construct a new externally-sourced reservation from a canonical
    /// booking, with an optional assigned room.
    pub fn from_canonical(
        booking: &CanonicalBooking,
        room_id: Option<RoomId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            external_id: Some(booking.external_id.clone()),
            source: Some(booking.source.clone()),
            room_id,
            guest_name: booking.guest_name.clone(),
            guest_email: booking.guest_email.clone(),
            guest_phone: booking.guest_phone.clone(),
            room_type: booking.room_type.clone(),
            room_number: booking.room_number.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            guest_count: booking.guest_count,
            total_amount: booking.total_amount,
            currency: booking.currency.clone(),
            status: booking.status,
            booked_at: booking.booked_at,
            special_requests: booking.special_requests.clone(),
            metadata: booking.metadata.clone(),
            is_external: true,
            created_at: now,
            updated_at: now,
            last_sync_at: Some(now),
        }
    }

    /// Merge all canonical fields into this reservation (update path).
    ///
    /// Identity, room assignment, and creation timestamp survive; every
    /// booking-level field is overwritten by the incoming copy.
    pub fn merge_canonical(&mut self, booking: &CanonicalBooking, now: DateTime<Utc>) {
        self.guest_name = booking.guest_name.clone();
        self.guest_email = booking.guest_email.clone();
        self.guest_phone = booking.guest_phone.clone();
        self.room_type = booking.room_type.clone();
        self.room_number = booking.room_number.clone();
        self.check_in = booking.check_in;
        self.check_out = booking.check_out;
        self.guest_count = booking.guest_count;
        self.total_amount = booking.total_amount;
        self.currency = booking.currency.clone();
        self.status = booking.status;
        self.booked_at = booking.booked_at;
        self.special_requests = booking.special_requests.clone();
        self.metadata = booking.metadata.clone();
        self.updated_at = now;
        self.last_sync_at = Some(now);
    }

    /// Whether this reservation blocks its room's dates.
    pub fn blocks_room(&self) -> bool {
        self.status.blocks_room()
    }
}
