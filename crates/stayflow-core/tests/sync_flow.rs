// End-to-end sync scenarios: stub booking sources driven through the
// orchestrator, asserting on reservations, room status, housekeeping
// tasks, and sync-report accounting.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;

use stayflow_core::{
    BookingSource, BookingStatus, CanonicalBooking, CoreError, Room, RoomStatus, SourceConfig,
    SourceCredentials, SourceKind, StayStore, SyncOrchestrator, SyncSettings, TaskKind,
    TransportConfig,
};

// ── Stub source ──────────────────────────────────────────────────────

/// What the stub returns on the next fetch. Swappable between cycles.
struct StubState {
    response: Mutex<Result<Vec<CanonicalBooking>, String>>,
    probe_ok: Mutex<bool>,
}

struct StubSource {
    state: Arc<StubState>,
}

#[async_trait]
impl BookingSource for StubSource {
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError> {
        match &*self.state.response.lock().expect("stub lock") {
            Ok(bookings) => Ok(bookings.clone()),
            Err(message) => Err(CoreError::Api {
                message: message.clone(),
                status: Some(503),
            }),
        }
    }

    async fn probe(&self) -> Result<(), CoreError> {
        if *self.state.probe_ok.lock().expect("stub lock") {
            Ok(())
        } else {
            Err(CoreError::ConnectionFailed {
                reason: "stub offline".into(),
            })
        }
    }
}

// ── Fixture ──────────────────────────────────────────────────────────

struct Fixture {
    store: Arc<StayStore>,
    orchestrator: SyncOrchestrator,
    stub: Arc<StubState>,
}

fn fixture() -> Fixture {
    let store = Arc::new(StayStore::new());
    let stub = Arc::new(StubState {
        response: Mutex::new(Ok(Vec::new())),
        probe_ok: Mutex::new(true),
    });

    let factory_stub = Arc::clone(&stub);
    let orchestrator = SyncOrchestrator::with_adapter_factory(
        Arc::clone(&store),
        TransportConfig::default(),
        Box::new(
            move |_config: &SourceConfig,
                  _transport: &TransportConfig|
                  -> Result<Box<dyn BookingSource>, CoreError> {
                Ok(Box::new(StubSource {
                    state: Arc::clone(&factory_stub),
                }))
            },
        ),
    );

    orchestrator
        .setup_source_config(source_config("pms", true))
        .expect("source config");

    Fixture {
        store,
        orchestrator,
        stub,
    }
}

fn source_config(name: &str, active: bool) -> SourceConfig {
    SourceConfig {
        name: name.into(),
        kind: SourceKind::Pms,
        endpoint: "https://stub.example.com".parse().expect("url"),
        credentials: SourceCredentials::Bearer {
            token: SecretString::from("stub-token"),
        },
        protocol_version: "v1".into(),
        active,
        settings: SyncSettings {
            interval_secs: 0,
            ..SyncSettings::default()
        },
        property_id: None,
    }
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("timestamp")
}

fn booking(external_id: &str, status: BookingStatus) -> CanonicalBooking {
    CanonicalBooking {
        external_id: external_id.into(),
        source: "pms".into(),
        guest_name: "Ada Lovelace".into(),
        guest_email: "a@b.com".into(),
        guest_phone: String::new(),
        room_type: "Deluxe".into(),
        room_number: None,
        check_in: at("2024-07-10T00:00:00Z"),
        check_out: at("2024-07-12T00:00:00Z"),
        guest_count: 2,
        total_amount: 500.0,
        currency: "EUR".into(),
        status,
        booked_at: None,
        special_requests: String::new(),
        metadata: serde_json::Map::new(),
    }
}

fn set_batch(stub: &StubState, bookings: Vec<CanonicalBooking>) {
    *stub.response.lock().expect("stub lock") = Ok(bookings);
}

fn set_failure(stub: &StubState, message: &str) {
    *stub.response.lock().expect("stub lock") = Err(message.into());
}

// ── Scenarios ────────────────────────────────────────────────────────

#[tokio::test]
async fn new_confirmed_booking_end_to_end() {
    let f = fixture();
    let room_id = f.store.add_room(Room::new("101", "Deluxe"));

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);

    let report = f.orchestrator.sync_source("pms").await.expect("sync");

    assert_eq!(report.fetched, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.errors, 0);

    // One reservation, room reserved, inspection scheduled 4h before
    // check-in.
    assert_eq!(f.store.reservation_count(), 1);
    assert_eq!(f.store.room(room_id).expect("room").status, RoomStatus::Reserved);

    let tasks = f.store.tasks_for_room(room_id);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].kind, TaskKind::PreArrivalInspection);
    assert_eq!(tasks[0].scheduled_for, at("2024-07-09T20:00:00Z"));
}

#[tokio::test]
async fn resync_to_checked_out_flips_room_and_creates_one_cleaning_task() {
    let f = fixture();
    let room_id = f.store.add_room(Room::new("101", "Deluxe"));

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);
    f.orchestrator.sync_source("pms").await.expect("first sync");

    set_batch(&f.stub, vec![booking("X1", BookingStatus::CheckedOut)]);
    let report = f.orchestrator.sync_source("pms").await.expect("second sync");

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 1);

    assert_eq!(f.store.reservation_count(), 1);
    assert_eq!(f.store.room(room_id).expect("room").status, RoomStatus::Cleaning);

    let cleaning: Vec<_> = f
        .store
        .tasks_for_room(room_id)
        .into_iter()
        .filter(|t| t.kind == TaskKind::CheckoutCleaning)
        .collect();
    assert_eq!(cleaning.len(), 1);
}

#[tokio::test]
async fn repeated_identical_sync_is_idempotent() {
    let f = fixture();
    let room_id = f.store.add_room(Room::new("101", "Deluxe"));

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);
    f.orchestrator.sync_source("pms").await.expect("first sync");
    let report = f.orchestrator.sync_source("pms").await.expect("second sync");

    assert_eq!(report.updated, 1);
    assert_eq!(f.store.reservation_count(), 1);
    // Same status twice: no extra housekeeping task.
    assert_eq!(f.store.tasks_for_room(room_id).len(), 1);
}

#[tokio::test]
async fn malformed_record_counts_as_error_and_batch_continues() {
    let f = fixture();
    f.store.add_room(Room::new("101", "Deluxe"));
    f.store.add_room(Room::new("102", "Deluxe"));

    let mut bad = booking("", BookingStatus::Confirmed);
    bad.external_id = String::new();
    // Distinct guests so the fallback match cannot merge them.
    let mut second = booking("X2", BookingStatus::Confirmed);
    second.guest_email = "second@b.com".into();

    set_batch(
        &f.stub,
        vec![booking("X1", BookingStatus::Confirmed), bad, second],
    );

    let report = f.orchestrator.sync_source("pms").await.expect("sync");

    assert_eq!(report.fetched, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.errors, 1);
    assert_eq!(report.created + report.updated + report.errors, report.fetched);
}

#[tokio::test]
async fn no_free_room_persists_unassigned_without_error() {
    let f = fixture();
    // No rooms registered at all.

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);
    let report = f.orchestrator.sync_source("pms").await.expect("sync");

    assert_eq!(report.created, 1);
    assert_eq!(report.errors, 0);

    let reservations = f.store.reservations_snapshot();
    assert_eq!(reservations.len(), 1);
    assert!(reservations[0].room_id.is_none());
}

#[tokio::test]
async fn unknown_source_is_rejected_without_partial_work() {
    let f = fixture();

    let err = f.orchestrator.sync_source("nope").await.expect_err("must fail");
    assert!(matches!(err, CoreError::UnknownSource { .. }));
    assert_eq!(f.store.reservation_count(), 0);
    assert!(f.store.log_entries().is_empty());
}

#[tokio::test]
async fn inactive_source_is_rejected() {
    let f = fixture();
    f.orchestrator
        .setup_source_config(source_config("dormant", false))
        .expect("config");

    let err = f
        .orchestrator
        .sync_source("dormant")
        .await
        .expect_err("must fail");
    assert!(matches!(err, CoreError::SourceInactive { .. }));
}

#[tokio::test]
async fn fetch_failure_aborts_cycle_and_is_logged() {
    let f = fixture();
    set_failure(&f.stub, "upstream 503");

    let err = f.orchestrator.sync_source("pms").await.expect_err("must fail");
    assert!(err.is_cycle_fatal());

    let failures = f.store.recent_failures(10);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].source, "pms");

    let status = f.orchestrator.integration_status();
    assert_eq!(status.total_sources, 1);
    assert_eq!(status.active_sources, 1);
    assert_eq!(status.recent_failures.len(), 1);
}

#[tokio::test]
async fn sync_log_records_counts() {
    let f = fixture();
    f.store.add_room(Room::new("101", "Deluxe"));

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);
    f.orchestrator.sync_source("pms").await.expect("sync");

    let log = f.store.log_entries();
    assert_eq!(log.len(), 1);
    assert!(log[0].success);
    assert_eq!(log[0].operation, "sync");
    assert_eq!(log[0].detail["fetched"], 1);
    assert_eq!(log[0].detail["created"], 1);
}

#[tokio::test]
async fn test_connection_reports_latency_without_touching_reservations() {
    let f = fixture();

    let probe = f.orchestrator.test_connection("pms").await.expect("probe");
    assert!(probe.ok);
    assert_eq!(f.store.reservation_count(), 0);

    *f.stub.probe_ok.lock().expect("stub lock") = false;
    let probe = f.orchestrator.test_connection("pms").await.expect("probe");
    assert!(!probe.ok);
    assert!(probe.message.is_some());
}

#[tokio::test]
async fn cancellation_frees_the_room() {
    let f = fixture();
    let room_id = f.store.add_room(Room::new("101", "Deluxe"));

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Confirmed)]);
    f.orchestrator.sync_source("pms").await.expect("first sync");
    assert_eq!(f.store.room(room_id).expect("room").status, RoomStatus::Reserved);

    set_batch(&f.stub, vec![booking("X1", BookingStatus::Cancelled)]);
    f.orchestrator.sync_source("pms").await.expect("second sync");

    let room = f.store.room(room_id).expect("room");
    assert_eq!(room.status, RoomStatus::Available);
    assert!(room.current_booking.is_none());

    // The freed room is assignable to a new overlapping booking.
    let mut other = booking("X9", BookingStatus::Confirmed);
    other.guest_email = "other@b.com".into();
    set_batch(&f.stub, vec![other]);
    f.orchestrator.sync_source("pms").await.expect("third sync");

    let reservations = f.store.reservations_snapshot();
    let newest = reservations
        .iter()
        .find(|r| r.external_id.as_deref() == Some("X9"))
        .expect("new reservation");
    assert_eq!(newest.room_id, Some(room_id));
}

#[tokio::test]
async fn overlapping_bookings_never_share_a_room() {
    let f = fixture();
    let room_id = f.store.add_room(Room::new("101", "Deluxe"));

    let mut second = booking("X2", BookingStatus::Confirmed);
    second.guest_email = "second@b.com".into();
    second.check_in = at("2024-07-11T00:00:00Z");
    second.check_out = at("2024-07-13T00:00:00Z");

    set_batch(
        &f.stub,
        vec![booking("X1", BookingStatus::Confirmed), second],
    );
    let report = f.orchestrator.sync_source("pms").await.expect("sync");
    assert_eq!(report.created, 2);

    let on_room: Vec<_> = f
        .store
        .reservations_snapshot()
        .iter()
        .filter(|r| r.room_id == Some(room_id) && r.blocks_room())
        .cloned()
        .collect();
    assert_eq!(on_room.len(), 1, "second overlapping booking must stay unassigned");
}

#[tokio::test]
async fn shutdown_cancels_pending_cycles() {
    let f = fixture();
    f.orchestrator.start().await;
    f.orchestrator.shutdown().await;

    let err = f.orchestrator.sync_source("pms").await.expect_err("cancelled");
    assert!(matches!(err, CoreError::Internal(_)));
}
