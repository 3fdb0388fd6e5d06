// stayflow-core: reconciliation layer between the channel clients
// (stayflow-api) and the internal reservation store.

pub mod adapter;
pub mod assignment;
pub mod availability;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod reconcile;
pub mod status;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use stayflow_api::{TlsMode, TransportConfig};

pub use adapter::BookingSource;
pub use dispatch::SideEffectDispatcher;
pub use error::CoreError;
pub use orchestrator::{IntegrationStatus, ProbeReport, SyncOrchestrator, SyncReport};
pub use reconcile::{ReconcileOutcome, ReconciliationEngine, StatusTransition};
pub use status::map_vendor_status;
pub use store::StayStore;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Bookings / reservations
    BookingStatus, BookingWindow, CanonicalBooking, Reservation, ReservationId,
    // Rooms / housekeeping
    HousekeepingTask, Room, RoomId, RoomStatus, TaskId, TaskKind,
    // Sources / audit
    SourceConfig, SourceCredentials, SourceKind, SyncLogEntry, SyncSettings,
};
