// ── Central store ──
//
// Aggregates the reservation and room collections with the append-only
// housekeeping and sync-log stores. Components receive it as an
// `Arc<StayStore>` constructor argument -- there is no ambient handle.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::reservations::ReservationCollection;
use super::rooms::RoomCollection;
use crate::model::{
    BookingWindow, HousekeepingTask, Reservation, ReservationId, Room, RoomId, RoomStatus,
    SyncLogEntry,
};

/// Thread-safe in-memory store for all persisted entities.
///
/// Reads are wait-free snapshots; writes use fine-grained per-shard
/// locks within `DashMap`. Mutations are broadcast to subscribers via
/// `watch` channels so external collaborators (dashboards, maintenance
/// tooling) can observe changes without polling.
pub struct StayStore {
    reservations: ReservationCollection,
    rooms: RoomCollection,
    tasks: RwLock<Vec<Arc<HousekeepingTask>>>,
    sync_log: RwLock<Vec<SyncLogEntry>>,
}

impl StayStore {
    pub fn new() -> Self {
        Self {
            reservations: ReservationCollection::new(),
            rooms: RoomCollection::new(),
            tasks: RwLock::new(Vec::new()),
            sync_log: RwLock::new(Vec::new()),
        }
    }

    // ── Reservations ─────────────────────────────────────────────────

    /// Insert an externally-sourced reservation. `Err(existing)` means
    /// the (source, external_id) pair is already present.
    pub fn insert_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<ReservationId, ReservationId> {
        self.reservations.insert_external(reservation)
    }

    pub fn update_reservation<F>(&self, id: ReservationId, f: F) -> Option<Arc<Reservation>>
    where
        F: FnOnce(&mut Reservation),
    {
        self.reservations.update(id, f)
    }

    pub fn reservation(&self, id: ReservationId) -> Option<Arc<Reservation>> {
        self.reservations.get(id)
    }

    pub fn find_by_external(&self, source: &str, external_id: &str) -> Option<Arc<Reservation>> {
        self.reservations.get_by_external(source, external_id)
    }

    /// Fallback match: same guest email and exact stay interval.
    /// Catches re-imports under a changed external id and cross-source
    /// duplicates. First match in snapshot order wins.
    pub fn find_by_guest_window(
        &self,
        guest_email: &str,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Option<Arc<Reservation>> {
        if guest_email.is_empty() {
            return None;
        }
        self.reservations
            .snapshot()
            .iter()
            .find(|r| {
                r.guest_email.eq_ignore_ascii_case(guest_email)
                    && r.check_in == check_in
                    && r.check_out == check_out
            })
            .cloned()
    }

    /// All reservations referencing the given room.
    pub fn reservations_for_room(&self, room_id: RoomId) -> Vec<Arc<Reservation>> {
        self.reservations
            .snapshot()
            .iter()
            .filter(|r| r.room_id == Some(room_id))
            .cloned()
            .collect()
    }

    pub fn reservations_snapshot(&self) -> Arc<Vec<Arc<Reservation>>> {
        self.reservations.snapshot()
    }

    pub fn subscribe_reservations(&self) -> watch::Receiver<Arc<Vec<Arc<Reservation>>>> {
        self.reservations.subscribe()
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub fn add_room(&self, room: Room) -> RoomId {
        self.rooms.insert(room)
    }

    pub fn room(&self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.get(id)
    }

    /// Status is the only room attribute this core ever mutates.
    pub fn set_room_status(&self, id: RoomId, status: RoomStatus) -> Option<RoomStatus> {
        self.rooms.set_status(id, status)
    }

    pub fn set_room_booking(&self, id: RoomId, window: Option<BookingWindow>) -> bool {
        self.rooms.set_booking(id, window)
    }

    pub fn rooms_snapshot(&self) -> Arc<Vec<Arc<Room>>> {
        self.rooms.snapshot()
    }

    pub fn subscribe_rooms(&self) -> watch::Receiver<Arc<Vec<Arc<Room>>>> {
        self.rooms.subscribe()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // ── Housekeeping tasks (append-only) ─────────────────────────────

    pub fn add_task(&self, task: HousekeepingTask) {
        if let Ok(mut tasks) = self.tasks.write() {
            tasks.push(Arc::new(task));
        }
    }

    pub fn tasks_snapshot(&self) -> Vec<Arc<HousekeepingTask>> {
        self.tasks.read().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn tasks_for_room(&self, room_id: RoomId) -> Vec<Arc<HousekeepingTask>> {
        self.tasks_snapshot()
            .into_iter()
            .filter(|t| t.room_id == room_id)
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.read().map(|t| t.len()).unwrap_or(0)
    }

    // ── Sync log (append-only) ───────────────────────────────────────

    pub fn append_log(&self, entry: SyncLogEntry) {
        if let Ok(mut log) = self.sync_log.write() {
            log.push(entry);
        }
    }

    pub fn log_entries(&self) -> Vec<SyncLogEntry> {
        self.sync_log.read().map(|l| l.clone()).unwrap_or_default()
    }

    /// The `limit` most recent failed entries across all sources,
    /// newest first.
    pub fn recent_failures(&self, limit: usize) -> Vec<SyncLogEntry> {
        let entries = self.log_entries();
        entries
            .into_iter()
            .rev()
            .filter(|e| !e.success)
            .take(limit)
            .collect()
    }
}

impl Default for StayStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn recent_failures_filters_and_caps() {
        let store = StayStore::new();
        for i in 0..15 {
            store.append_log(SyncLogEntry::new(
                "pms",
                "sync",
                serde_json::json!({ "i": i }),
                i % 2 == 0,
            ));
        }

        let failures = store.recent_failures(10);
        assert_eq!(failures.len(), 7);
        assert!(failures.iter().all(|e| !e.success));
        // Newest first
        assert_eq!(failures[0].detail["i"], 13);
    }

    #[test]
    fn tasks_for_room_filters() {
        let store = StayStore::new();
        let room = store.add_room(Room::new("101", "Standard"));
        let other = store.add_room(Room::new("102", "Standard"));

        store.add_task(HousekeepingTask {
            id: crate::model::TaskId::new(),
            room_id: room,
            kind: crate::model::TaskKind::CheckoutCleaning,
            scheduled_for: Utc::now(),
            instructions: String::new(),
            source: "pms".into(),
            created_at: Utc::now(),
        });

        assert_eq!(store.tasks_for_room(room).len(), 1);
        assert!(store.tasks_for_room(other).is_empty());
    }
}
