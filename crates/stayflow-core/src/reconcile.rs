// ── Reconciliation engine ──
//
// The create-vs-update decision for every canonical booking. Persists
// reservation state and *returns* the status-transition event; room
// mutation and housekeeping scheduling happen afterwards in the
// side-effect dispatcher, so a task-creation failure can never roll back
// a successful reservation write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::assignment::RoomAssignmentResolver;
use crate::error::CoreError;
use crate::model::{
    BookingStatus, BookingWindow, CanonicalBooking, Reservation, ReservationId, RoomId,
};
use crate::store::StayStore;

/// A reservation status change produced by reconciliation, consumed by
/// the side-effect dispatcher.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub reservation_id: ReservationId,
    pub room_id: Option<RoomId>,
    /// Source name, carried into housekeeping tasks for attribution.
    pub source: String,
    /// `None` for newly created reservations.
    pub from: Option<BookingStatus>,
    pub to: BookingStatus,
    pub check_in: DateTime<Utc>,
    pub is_new: bool,
}

/// Result of reconciling one canonical booking.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub is_new: bool,
    pub reservation_id: ReservationId,
    /// Present only when dispatch is warranted: always for new
    /// reservations, and for updates only when the status actually
    /// changed since the stored copy.
    pub transition: Option<StatusTransition>,
}

/// Decides create-vs-update and persists the canonical booking.
///
/// Safe to call concurrently for different bookings. Two concurrent
/// calls for the *same* (source, external_id) pair are resolved by the
/// store's uniqueness index: the losing insert degrades to an update.
pub struct ReconciliationEngine {
    store: Arc<StayStore>,
    resolver: RoomAssignmentResolver,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<StayStore>) -> Self {
        let resolver = RoomAssignmentResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Reconcile one canonical booking from `source_name`.
    ///
    /// Match priority: (a) exact (source, external_id); (b) fallback
    /// (guest_email, check_in, check_out) to catch re-imports under a
    /// changed external id and cross-source duplicates.
    pub fn reconcile(
        &self,
        booking: &CanonicalBooking,
        source_name: &str,
    ) -> Result<ReconcileOutcome, CoreError> {
        booking.validate().map_err(|reason| CoreError::RecordInvalid {
            external_id: booking.external_id.clone(),
            reason,
        })?;

        let now = Utc::now();

        let existing = self
            .store
            .find_by_external(source_name, &booking.external_id)
            .or_else(|| {
                self.store
                    .find_by_guest_window(&booking.guest_email, booking.check_in, booking.check_out)
            });

        if let Some(existing) = existing {
            return self.apply_update(existing.id, booking, now);
        }

        self.create(booking, now)
    }

    // ── Update path ──────────────────────────────────────────────────

    fn apply_update(
        &self,
        id: ReservationId,
        booking: &CanonicalBooking,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, CoreError> {
        let mut previous_status = None;
        let updated = self
            .store
            .update_reservation(id, |r| {
                previous_status = Some(r.status);
                r.merge_canonical(booking, now);
            })
            .ok_or_else(|| CoreError::ReservationNotFound {
                identifier: id.to_string(),
            })?;

        let previous_status =
            previous_status.ok_or_else(|| CoreError::Internal("update closure not run".into()))?;

        debug!(
            reservation = %id,
            external_id = %booking.external_id,
            from = %previous_status,
            to = %booking.status,
            "reconciled as update"
        );

        // Dispatch only on an actual status change; re-applying the same
        // status is a no-op all the way down.
        let transition = (previous_status != booking.status).then(|| StatusTransition {
            reservation_id: id,
            room_id: updated.room_id,
            source: booking.source.clone(),
            from: Some(previous_status),
            to: booking.status,
            check_in: booking.check_in,
            is_new: false,
        });

        Ok(ReconcileOutcome {
            is_new: false,
            reservation_id: id,
            transition,
        })
    }

    // ── Create path ──────────────────────────────────────────────────

    fn create(
        &self,
        booking: &CanonicalBooking,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, CoreError> {
        let room = self
            .resolver
            .assign_room(&booking.room_type, booking.check_in, booking.check_out);
        let room_id = room.as_ref().map(|r| r.id);

        let reservation = Reservation::from_canonical(booking, room_id, now);

        match self.store.insert_reservation(reservation) {
            Ok(id) => {
                // Cache the occupancy window on the room for confirmed
                // bookings that got one.
                if let Some(room_id) = room_id {
                    if booking.status == BookingStatus::Confirmed {
                        self.store.set_room_booking(
                            room_id,
                            Some(BookingWindow {
                                check_in: booking.check_in,
                                check_out: booking.check_out,
                            }),
                        );
                    }
                }

                debug!(
                    reservation = %id,
                    external_id = %booking.external_id,
                    room = ?room_id,
                    status = %booking.status,
                    "reconciled as create"
                );

                Ok(ReconcileOutcome {
                    is_new: true,
                    reservation_id: id,
                    transition: Some(StatusTransition {
                        reservation_id: id,
                        room_id,
                        source: booking.source.clone(),
                        from: None,
                        to: booking.status,
                        check_in: booking.check_in,
                        is_new: true,
                    }),
                })
            }
            // Uniqueness index collision: a concurrent cycle beat us to
            // the insert. Fall back to the update path.
            Err(existing_id) => self.apply_update(existing_id, booking, now),
        }
    }
}
