// ── Reservation collection ──
//
// DashMap storage keyed by ReservationId, with a unique secondary index
// on (source, external_id). The index is the storage-layer half of the
// duplicate-reservation control: an insert that collides returns the
// existing id so the caller can degrade to the update path.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

use crate::model::{Reservation, ReservationId};

pub(crate) struct ReservationCollection {
    by_id: DashMap<ReservationId, Arc<Reservation>>,

    /// Unique index: (source, external_id) -> reservation.
    external_index: DashMap<(String, String), ReservationId>,

    /// Full snapshot, rebuilt on mutation for subscribers.
    snapshot: watch::Sender<Arc<Vec<Arc<Reservation>>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,
}

impl ReservationCollection {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);

        Self {
            by_id: DashMap::new(),
            external_index: DashMap::new(),
            snapshot,
            version,
        }
    }

    /// Insert an externally-sourced reservation, enforcing uniqueness on
    /// (source, external_id).
    ///
    /// Returns `Err(existing_id)` when the index already holds an entry
    /// for that pair -- two overlapping cycles racing on the same
    /// logical booking land here, and the loser must update instead.
    pub(crate) fn insert_external(
        &self,
        reservation: Reservation,
    ) -> Result<ReservationId, ReservationId> {
        let key = match (&reservation.source, &reservation.external_id) {
            (Some(source), Some(external_id)) => (source.clone(), external_id.clone()),
            _ => {
                // No external identity: nothing to index, plain insert.
                let id = reservation.id;
                self.by_id.insert(id, Arc::new(reservation));
                self.publish();
                return Ok(id);
            }
        };

        match self.external_index.entry(key) {
            Entry::Occupied(occupied) => Err(*occupied.get()),
            Entry::Vacant(vacant) => {
                let id = reservation.id;
                vacant.insert(id);
                self.by_id.insert(id, Arc::new(reservation));
                self.publish();
                Ok(id)
            }
        }
    }

    /// Apply a mutation to a stored reservation, republishing the
    /// snapshot. Returns the updated copy.
    pub(crate) fn update<F>(&self, id: ReservationId, f: F) -> Option<Arc<Reservation>>
    where
        F: FnOnce(&mut Reservation),
    {
        let updated = {
            let mut entry = self.by_id.get_mut(&id)?;
            let mut copy = (**entry).clone();
            f(&mut copy);
            *entry.value_mut() = Arc::new(copy);
            Arc::clone(entry.value())
        };
        self.publish();
        Some(updated)
    }

    pub(crate) fn get(&self, id: ReservationId) -> Option<Arc<Reservation>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Index lookup on (source, external_id).
    pub(crate) fn get_by_external(&self, source: &str, external_id: &str) -> Option<Arc<Reservation>> {
        let key = (source.to_owned(), external_id.to_owned());
        let id = *self.external_index.get(&key)?;
        self.get(id)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<Reservation>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Reservation>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Rebuild and broadcast the snapshot, bump the version counter.
    fn publish(&self) {
        let values: Vec<Arc<Reservation>> =
            self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BookingStatus, CanonicalBooking};
    use chrono::Utc;

    fn booking(external_id: &str) -> CanonicalBooking {
        CanonicalBooking {
            external_id: external_id.into(),
            source: "pms".into(),
            guest_name: "Guest".into(),
            guest_email: "g@example.com".into(),
            guest_phone: String::new(),
            room_type: "Standard".into(),
            room_number: None,
            check_in: "2024-07-10T00:00:00Z".parse().unwrap(),
            check_out: "2024-07-12T00:00:00Z".parse().unwrap(),
            guest_count: 1,
            total_amount: 100.0,
            currency: "EUR".into(),
            status: BookingStatus::Confirmed,
            booked_at: None,
            special_requests: String::new(),
            metadata: serde_json::Map::new(),
        }
    }

    fn reservation(external_id: &str) -> Reservation {
        Reservation::from_canonical(&booking(external_id), None, Utc::now())
    }

    #[test]
    fn insert_then_lookup_by_external() {
        let col = ReservationCollection::new();
        let id = col.insert_external(reservation("A1")).unwrap();
        let found = col.get_by_external("pms", "A1").unwrap();
        assert_eq!(found.id, id);
    }

    #[test]
    fn duplicate_external_insert_returns_existing_id() {
        let col = ReservationCollection::new();
        let first = col.insert_external(reservation("A1")).unwrap();
        let second = col.insert_external(reservation("A1"));
        assert_eq!(second, Err(first));
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn update_republishes_snapshot() {
        let col = ReservationCollection::new();
        let id = col.insert_external(reservation("A1")).unwrap();

        col.update(id, |r| r.status = BookingStatus::CheckedIn).unwrap();

        let snap = col.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].status, BookingStatus::CheckedIn);
    }

    #[test]
    fn same_external_id_different_source_is_distinct() {
        let col = ReservationCollection::new();
        col.insert_external(reservation("A1")).unwrap();

        let mut other = reservation("A1");
        other.source = Some("ota".into());
        assert!(col.insert_external(other).is_ok());
        assert_eq!(col.len(), 2);
    }
}
