// ── Room collection ──
//
// Only the status field and the booking-window cache are mutable through
// this API; room identity and type are fixed at registration.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::{BookingWindow, Room, RoomId, RoomStatus};

pub(crate) struct RoomCollection {
    by_id: DashMap<RoomId, Arc<Room>>,
    snapshot: watch::Sender<Arc<Vec<Arc<Room>>>>,
    version: watch::Sender<u64>,
}

impl RoomCollection {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (version, _) = watch::channel(0u64);

        Self {
            by_id: DashMap::new(),
            snapshot,
            version,
        }
    }

    pub(crate) fn insert(&self, room: Room) -> RoomId {
        let id = room.id;
        self.by_id.insert(id, Arc::new(room));
        self.publish();
        id
    }

    pub(crate) fn get(&self, id: RoomId) -> Option<Arc<Room>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Flip a room's status. Returns the previous status, or `None` if
    /// the room is unknown.
    pub(crate) fn set_status(&self, id: RoomId, status: RoomStatus) -> Option<RoomStatus> {
        let previous = {
            let mut entry = self.by_id.get_mut(&id)?;
            let mut copy = (**entry).clone();
            let previous = copy.status;
            copy.status = status;
            *entry.value_mut() = Arc::new(copy);
            previous
        };
        self.publish();
        Some(previous)
    }

    /// Set or clear the booking-window cache.
    pub(crate) fn set_booking(&self, id: RoomId, window: Option<BookingWindow>) -> bool {
        let found = {
            match self.by_id.get_mut(&id) {
                Some(mut entry) => {
                    let mut copy = (**entry).clone();
                    copy.current_booking = window;
                    *entry.value_mut() = Arc::new(copy);
                    true
                }
                None => false,
            }
        };
        if found {
            self.publish();
        }
        found
    }

    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<Room>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Room>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    fn publish(&self) {
        let values: Vec<Arc<Room>> = self.by_id.iter().map(|r| Arc::clone(r.value())).collect();
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_status_returns_previous() {
        let col = RoomCollection::new();
        let id = col.insert(Room::new("101", "Standard"));

        let prev = col.set_status(id, RoomStatus::Occupied).unwrap();
        assert_eq!(prev, RoomStatus::Available);
        assert_eq!(col.get(id).unwrap().status, RoomStatus::Occupied);
    }

    #[test]
    fn unknown_room_returns_none() {
        let col = RoomCollection::new();
        assert!(col.set_status(RoomId::new(), RoomStatus::Cleaning).is_none());
    }
}
