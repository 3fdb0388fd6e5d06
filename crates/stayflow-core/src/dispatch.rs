// ── Side-effect dispatch ──
//
// Consumes the status-transition events the reconciliation engine
// produces: flips room status and schedules housekeeping tasks. Runs
// after persistence, so a failure here never rolls back a reservation
// write.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{BookingStatus, HousekeepingTask, RoomStatus, TaskId, TaskKind};
use crate::reconcile::StatusTransition;
use crate::store::StayStore;

/// Hours before check-in at which the pre-arrival inspection is due.
const PRE_ARRIVAL_LEAD_HOURS: i64 = 4;

const CHECKOUT_CHECKLIST: &str = "Strip and replace linens; restock minibar and amenities; \
     full bathroom clean; inspect for damage and lost property";

const PRE_ARRIVAL_CHECKLIST: &str =
    "Verify room readiness: cleanliness, amenities, climate control, key cards";

/// Maps reservation status changes onto room-status writes and
/// housekeeping task creation.
pub struct SideEffectDispatcher {
    store: Arc<StayStore>,
}

impl SideEffectDispatcher {
    pub fn new(store: Arc<StayStore>) -> Self {
        Self { store }
    }

    /// Apply the side effects of one status transition.
    ///
    /// Idempotent with respect to room state: the room is written only
    /// when the mapped status differs from its current one. Task
    /// creation happens at most once per triggering event because the
    /// engine only emits a transition when the status actually changed.
    pub fn dispatch(&self, transition: &StatusTransition) -> Result<(), CoreError> {
        if let Some(room_id) = transition.room_id {
            if let Some(mapped) = room_status_for(transition.to) {
                let room = self.store.room(room_id).ok_or_else(|| CoreError::RoomNotFound {
                    identifier: room_id.to_string(),
                })?;

                if room.status != mapped {
                    self.store.set_room_status(room_id, mapped);
                    debug!(
                        room = %room.number,
                        from = %room.status,
                        to = %mapped,
                        "room status transition"
                    );
                }

                // A cancellation frees the cached occupancy window.
                if transition.to == BookingStatus::Cancelled {
                    self.store.set_room_booking(room_id, None);
                }
            }

            self.schedule_tasks(transition, room_id);
        }

        Ok(())
    }

    fn schedule_tasks(&self, transition: &StatusTransition, room_id: crate::model::RoomId) {
        match transition.to {
            // Entering checked-out: clean the room now.
            BookingStatus::CheckedOut => {
                let now = Utc::now();
                self.store.add_task(HousekeepingTask {
                    id: TaskId::new(),
                    room_id,
                    kind: TaskKind::CheckoutCleaning,
                    scheduled_for: now,
                    instructions: CHECKOUT_CHECKLIST.into(),
                    source: transition.source.clone(),
                    created_at: now,
                });
                debug!(room = %room_id, "scheduled checkout cleaning");
            }

            // A brand-new confirmed booking: inspect before arrival.
            BookingStatus::Confirmed if transition.is_new => {
                let now = Utc::now();
                self.store.add_task(HousekeepingTask {
                    id: TaskId::new(),
                    room_id,
                    kind: TaskKind::PreArrivalInspection,
                    scheduled_for: transition.check_in
                        - Duration::hours(PRE_ARRIVAL_LEAD_HOURS),
                    instructions: PRE_ARRIVAL_CHECKLIST.into(),
                    source: transition.source.clone(),
                    created_at: now,
                });
                debug!(room = %room_id, "scheduled pre-arrival inspection");
            }

            _ => {}
        }
    }
}

/// The room status implied by a reservation status, if any.
///
/// `Modified` is a booking-detail change, not an occupancy change, so it
/// maps to no room write.
fn room_status_for(status: BookingStatus) -> Option<RoomStatus> {
    match status {
        BookingStatus::Confirmed => Some(RoomStatus::Reserved),
        BookingStatus::CheckedIn => Some(RoomStatus::Occupied),
        BookingStatus::CheckedOut => Some(RoomStatus::Cleaning),
        BookingStatus::Cancelled => Some(RoomStatus::Available),
        BookingStatus::Modified => None,
    }
}
