// ── Core identity types ──
//
// Uuid newtypes for the persisted entities. Newtypes rather than bare
// Uuid so a reservation id can never be passed where a room id belongs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(u: Uuid) -> Self {
                Self(u)
            }
        }
    };
}

uuid_id! {
    /// Identity of a persisted reservation.
    ReservationId
}

uuid_id! {
    /// Identity of a physical room.
    RoomId
}

uuid_id! {
    /// Identity of a housekeeping task.
    TaskId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ReservationId::new(), ReservationId::new());
    }

    #[test]
    fn display_matches_uuid() {
        let raw = Uuid::new_v4();
        let id = RoomId::from(raw);
        assert_eq!(id.to_string(), raw.to_string());
    }
}
