// ── Canonical domain model ──
//
// The strongly-typed shapes the rest of the system sees. Vendor field
// variance stops at the adapter boundary; nothing past it handles raw
// wire payloads.

pub mod booking;
pub mod housekeeping;
pub mod ids;
pub mod reservation;
pub mod room;
pub mod source;
pub mod sync_log;

pub use booking::{BookingStatus, CanonicalBooking};
pub use housekeeping::{HousekeepingTask, TaskKind};
pub use ids::{ReservationId, RoomId, TaskId};
pub use reservation::Reservation;
pub use room::{BookingWindow, Room, RoomStatus};
pub use source::{SourceConfig, SourceCredentials, SourceKind, SyncSettings};
pub use sync_log::SyncLogEntry;
