// ── Vendor status mapping ──
//
// External systems each speak their own status vocabulary. This module
// folds every known synonym into the internal enumeration.

use tracing::warn;

use crate::model::BookingStatus;

/// Map a vendor status string to the internal enumeration.
///
/// Lookup is case-insensitive against a fixed synonym table. Any
/// unrecognized string maps to [`BookingStatus::Confirmed`]: external
/// systems may introduce new status strings without breaking ingestion,
/// at the cost of conservatively treating unknowns as active bookings.
/// Unmapped strings are logged so a new cancellation-adjacent synonym is
/// at least visible operationally.
pub fn map_vendor_status(raw: &str) -> BookingStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "booked" | "reserved" | "active" | "confirmed" | "ok" | "new" => {
            BookingStatus::Confirmed
        }
        "canceled" | "cancelled" | "cancellation" | "void" | "no_show" | "noshow" => {
            BookingStatus::Cancelled
        }
        "modified" | "amended" | "changed" | "updated" => BookingStatus::Modified,
        "in_house" | "inhouse" | "checked_in" | "checkedin" | "arrived" => {
            BookingStatus::CheckedIn
        }
        "checked_out" | "checkedout" | "departed" | "completed" => BookingStatus::CheckedOut,
        "" => BookingStatus::Confirmed,
        other => {
            warn!(status = other, "unmapped vendor status, defaulting to confirmed");
            BookingStatus::Confirmed
        }
    }
}
