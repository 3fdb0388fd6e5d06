// ── Availability checking ──
//
// Half-open interval semantics throughout: a stay occupies
// [check_in, check_out), so a checkout and a same-day check-in never
// collide.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::RoomId;
use crate::store::StayStore;

/// Half-open interval overlap: `[a1, a2)` and `[b1, b2)` overlap iff
/// `a1 < b2 && b1 < a2`.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Decides whether a room is free for a date interval.
pub struct AvailabilityChecker {
    store: Arc<StayStore>,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<StayStore>) -> Self {
        Self { store }
    }

    /// A room is unavailable iff any reservation on it whose status
    /// blocks the room overlaps the requested interval.
    pub fn is_available(
        &self,
        room_id: RoomId,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> bool {
        self.store
            .reservations_for_room(room_id)
            .iter()
            .filter(|r| r.blocks_room())
            .all(|r| !intervals_overlap(check_in, check_out, r.check_in, r.check_out))
    }
}
