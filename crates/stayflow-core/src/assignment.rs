// ── Room assignment ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::availability::AvailabilityChecker;
use crate::model::{Room, RoomStatus};
use crate::store::StayStore;

/// Assigns a room for a canonical booking, or reports that none is free.
///
/// `None` is an accepted outcome, not an error: the booking is persisted
/// unassigned and tracked for manual resolution.
pub struct RoomAssignmentResolver {
    store: Arc<StayStore>,
    availability: AvailabilityChecker,
}

impl RoomAssignmentResolver {
    pub fn new(store: Arc<StayStore>) -> Self {
        let availability = AvailabilityChecker::new(Arc::clone(&store));
        Self {
            store,
            availability,
        }
    }

    /// Pick a room for the requested type and interval.
    ///
    /// Candidates whose type matches case-insensitively and whose status
    /// is assignable (available or mid-clean) are tried in room-number
    /// order; the first one that passes the availability check wins.
    /// If no typed match is free, any single `available` room is offered
    /// as a fallback, re-verified the same way.
    pub fn assign_room(
        &self,
        room_type: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Option<Arc<Room>> {
        let rooms = self.store.rooms_snapshot();

        let mut typed: Vec<&Arc<Room>> = rooms
            .iter()
            .filter(|r| r.room_type.eq_ignore_ascii_case(room_type) && r.is_assignable())
            .collect();
        typed.sort_by(|a, b| a.number.cmp(&b.number));

        for room in typed {
            if self.availability.is_available(room.id, check_in, check_out) {
                return Some(Arc::clone(room));
            }
        }

        // Fallback: any available room, regardless of type.
        let mut fallback: Vec<&Arc<Room>> = rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Available)
            .collect();
        fallback.sort_by(|a, b| a.number.cmp(&b.number));

        for room in fallback {
            if self.availability.is_available(room.id, check_in, check_out) {
                debug!(
                    requested = room_type,
                    assigned = %room.room_type,
                    number = %room.number,
                    "no typed room free, assigned fallback"
                );
                return Some(Arc::clone(room));
            }
        }

        debug!(requested = room_type, "no room free for interval");
        None
    }
}
