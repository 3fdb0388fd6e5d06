// ── Canonical booking ──
//
// The source-agnostic shape every adapter must produce. Built fresh on
// each fetch and handed to the reconciliation engine; never persisted
// directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a booking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Modified,
    CheckedIn,
    CheckedOut,
}

impl BookingStatus {
    /// Whether a reservation in this status blocks its room's dates.
    ///
    /// Only confirmed and in-house bookings occupy a room for overlap
    /// purposes; cancelled, modified-pending, and departed ones do not.
    pub fn blocks_room(self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }
}

/// Normalized representation of one external reservation.
///
/// Adapters default missing optional fields (phone, special requests) to
/// empty strings rather than failing; the metadata bag carries anything
/// vendor-specific downstream consumers might want verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalBooking {
    pub external_id: String,
    /// Name of the source this booking was fetched from.
    pub source: String,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    pub room_type: String,
    #[serde(default)]
    pub room_number: Option<String>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub guest_count: u32,
    pub total_amount: f64,
    pub currency: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub booked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub special_requests: String,
    /// Opaque per-source extras, carried through untouched.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl CanonicalBooking {
    /// A booking is well-formed only if it has an external id and a
    /// non-inverted stay interval. Malformed records count as errors in
    /// the sync report, not silent drops.
    pub fn validate(&self) -> Result<(), String> {
        if self.external_id.is_empty() {
            return Err("missing external id".into());
        }
        if self.check_in >= self.check_out {
            return Err(format!(
                "check-in {} is not before check-out {}",
                self.check_in, self.check_out
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> CanonicalBooking {
        CanonicalBooking {
            external_id: "X1".into(),
            source: "pms".into(),
            guest_name: "Ada Lovelace".into(),
            guest_email: "ada@example.com".into(),
            guest_phone: String::new(),
            room_type: "Deluxe".into(),
            room_number: None,
            check_in: "2024-07-10T00:00:00Z".parse().expect("date"),
            check_out: "2024-07-12T00:00:00Z".parse().expect("date"),
            guest_count: 2,
            total_amount: 420.0,
            currency: "EUR".into(),
            status: BookingStatus::Confirmed,
            booked_at: None,
            special_requests: String::new(),
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn valid_booking_passes() {
        assert!(booking().validate().is_ok());
    }

    #[test]
    fn empty_external_id_rejected() {
        let mut b = booking();
        b.external_id.clear();
        assert!(b.validate().is_err());
    }

    #[test]
    fn inverted_interval_rejected() {
        let mut b = booking();
        std::mem::swap(&mut b.check_in, &mut b.check_out);
        assert!(b.validate().is_err());
    }

    #[test]
    fn blocking_statuses() {
        assert!(BookingStatus::Confirmed.blocks_room());
        assert!(BookingStatus::CheckedIn.blocks_room());
        assert!(!BookingStatus::Cancelled.blocks_room());
        assert!(!BookingStatus::CheckedOut.blocks_room());
        assert!(!BookingStatus::Modified.blocks_room());
    }
}
