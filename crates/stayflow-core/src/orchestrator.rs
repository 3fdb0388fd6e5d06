// ── Sync orchestration ──
//
// Runs one fetch-normalize-reconcile-log cycle per configured source,
// with timer-driven scheduling, per-source cycle serialization, and
// cancellation-aware shutdown. This module is the entire public
// operational surface of the core: sync_source, test_connection,
// integration_status, setup_source_config.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stayflow_api::TransportConfig;

use crate::adapter::{self, BookingSource};
use crate::dispatch::SideEffectDispatcher;
use crate::error::CoreError;
use crate::model::{CanonicalBooking, SourceConfig, SyncLogEntry};
use crate::reconcile::ReconciliationEngine;
use crate::store::StayStore;

/// Builds the adapter for a source. Swappable so tests can inject stub
/// sources without a live endpoint.
pub type AdapterFactory = dyn Fn(&SourceConfig, &TransportConfig) -> Result<Box<dyn BookingSource>, CoreError>
    + Send
    + Sync;

// ── Reports ──────────────────────────────────────────────────────────

/// Outcome of one sync cycle for one source.
///
/// Always internally consistent: every fetched record lands in exactly
/// one of created / updated / errors.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub source: String,
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    pub summary: String,
}

/// Outcome of a connection probe.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub source: String,
    pub ok: bool,
    pub latency_ms: u64,
    pub message: Option<String>,
}

/// Aggregate operational view across all sources.
#[derive(Debug, Clone)]
pub struct IntegrationStatus {
    pub total_sources: usize,
    pub active_sources: usize,
    /// The ten most recent failed sync-log entries, newest first.
    pub recent_failures: Vec<SyncLogEntry>,
}

const RECENT_FAILURE_LIMIT: usize = 10;

// ── Orchestrator ─────────────────────────────────────────────────────

/// The root component: owns the source-config map and drives sync
/// cycles through the engine and dispatcher.
///
/// Cheaply cloneable via `Arc` internals; cycles for different sources
/// run concurrently, while cycles for the *same* source are serialized
/// by a per-source-name mutex so overlapping triggers cannot race the
/// reconciliation engine's read-then-write step.
#[derive(Clone)]
pub struct SyncOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<StayStore>,
    engine: ReconciliationEngine,
    dispatcher: SideEffectDispatcher,
    transport: TransportConfig,
    adapter_factory: Box<AdapterFactory>,
    /// Read-only during a cycle; replaced wholesale by refresh_sources.
    sources: DashMap<String, Arc<SourceConfig>>,
    cycle_locks: DashMap<String, Arc<Mutex<()>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncOrchestrator {
    /// Create an orchestrator over the given store, using the real
    /// channel clients.
    pub fn new(store: Arc<StayStore>, transport: TransportConfig) -> Self {
        Self::with_adapter_factory(store, transport, Box::new(adapter::for_config))
    }

    /// Create an orchestrator with a custom adapter factory (tests
    /// substitute stub sources here).
    pub fn with_adapter_factory(
        store: Arc<StayStore>,
        transport: TransportConfig,
        adapter_factory: Box<AdapterFactory>,
    ) -> Self {
        let engine = ReconciliationEngine::new(Arc::clone(&store));
        let dispatcher = SideEffectDispatcher::new(Arc::clone(&store));

        Self {
            inner: Arc::new(Inner {
                store,
                engine,
                dispatcher,
                transport,
                adapter_factory,
                sources: DashMap::new(),
                cycle_locks: DashMap::new(),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<StayStore> {
        &self.inner.store
    }

    // ── Source configuration ─────────────────────────────────────────

    /// Insert or replace a source configuration, keyed by unique name.
    pub fn setup_source_config(&self, config: SourceConfig) -> Result<(), CoreError> {
        if config.name.trim().is_empty() {
            return Err(CoreError::Config {
                message: "source name must not be empty".into(),
            });
        }
        info!(source = %config.name, kind = %config.kind, "source configured");
        self.inner
            .sources
            .insert(config.name.clone(), Arc::new(config));
        Ok(())
    }

    /// Replace the whole source map (on-demand refresh from config).
    pub fn refresh_sources(&self, configs: Vec<SourceConfig>) -> Result<(), CoreError> {
        self.inner.sources.clear();
        for config in configs {
            self.setup_source_config(config)?;
        }
        Ok(())
    }

    pub fn source_names(&self) -> Vec<String> {
        self.inner.sources.iter().map(|e| e.key().clone()).collect()
    }

    // ── Sync cycle ───────────────────────────────────────────────────

    /// Run one sync cycle for the named source.
    ///
    /// A transport failure aborts this source's cycle only and is
    /// recorded in the sync log; a failing record increments the error
    /// count and processing continues.
    pub async fn sync_source(&self, name: &str) -> Result<SyncReport, CoreError> {
        let config = self.lookup(name)?;
        if !config.active {
            return Err(CoreError::SourceInactive { name: name.into() });
        }

        // Serialize cycles per source: an overlapping re-trigger waits
        // for the previous cycle instead of racing it.
        let lock = self.cycle_lock(name);
        let _guard = lock.lock().await;

        debug!(source = name, "sync cycle started");

        let adapter = (self.inner.adapter_factory)(&config, &self.inner.transport)?;

        let fetched_result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => {
                return Err(CoreError::Internal("shutdown in progress".into()));
            }
            result = adapter.fetch() => result,
        };

        let bookings = match fetched_result {
            Ok(bookings) => bookings,
            Err(e) => {
                warn!(source = name, error = %e, "fetch failed, cycle aborted");
                self.inner.store.append_log(SyncLogEntry::new(
                    name,
                    "sync",
                    json!({ "error": e.to_string() }),
                    false,
                ));
                return Err(e);
            }
        };

        let fetched = bookings.len();
        let mut created = 0usize;
        let mut updated = 0usize;
        let mut errors = 0usize;

        for booking in &bookings {
            match self.process_record(booking, name) {
                Ok(true) => created += 1,
                Ok(false) => updated += 1,
                Err(e) => {
                    errors += 1;
                    warn!(
                        source = name,
                        external_id = %booking.external_id,
                        error = %e,
                        "record failed, continuing batch"
                    );
                }
            }
        }

        let summary = format!(
            "{fetched} fetched: {created} created, {updated} updated, {errors} errors"
        );

        self.inner.store.append_log(SyncLogEntry::new(
            name,
            "sync",
            json!({
                "fetched": fetched,
                "created": created,
                "updated": updated,
                "errors": errors,
            }),
            errors == 0,
        ));

        info!(source = name, %summary, "sync cycle complete");

        Ok(SyncReport {
            source: name.to_owned(),
            fetched,
            created,
            updated,
            errors,
            summary,
        })
    }

    /// Reconcile one record and apply its side effects.
    ///
    /// A dispatch failure counts as this record's error; the
    /// reservation write it follows is never rolled back.
    fn process_record(&self, booking: &CanonicalBooking, source: &str) -> Result<bool, CoreError> {
        let outcome = self.inner.engine.reconcile(booking, source)?;
        if let Some(transition) = &outcome.transition {
            self.inner.dispatcher.dispatch(transition)?;
        }
        Ok(outcome.is_new)
    }

    // ── Health probe ─────────────────────────────────────────────────

    /// Probe a source's endpoint without touching reservation data.
    /// Reports latency and success; the probe outcome is also appended
    /// to the sync log.
    pub async fn test_connection(&self, name: &str) -> Result<ProbeReport, CoreError> {
        let config = self.lookup(name)?;
        let adapter = (self.inner.adapter_factory)(&config, &self.inner.transport)?;

        let started = std::time::Instant::now();
        let result = adapter.probe().await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = ProbeReport {
            source: name.to_owned(),
            ok: result.is_ok(),
            latency_ms,
            message: result.err().map(|e| e.to_string()),
        };

        self.inner.store.append_log(SyncLogEntry::new(
            name,
            "test_connection",
            json!({ "latency_ms": report.latency_ms, "error": report.message }),
            report.ok,
        ));

        Ok(report)
    }

    // ── Aggregate status ─────────────────────────────────────────────

    /// Operational view: source counts and the most recent failures
    /// across all sources.
    pub fn integration_status(&self) -> IntegrationStatus {
        let total_sources = self.inner.sources.len();
        let active_sources = self
            .inner
            .sources
            .iter()
            .filter(|e| e.value().active)
            .count();

        IntegrationStatus {
            total_sources,
            active_sources,
            recent_failures: self.inner.store.recent_failures(RECENT_FAILURE_LIMIT),
        }
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Spawn one timer-driven sync task per active source with a
    /// non-zero interval.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;

        for entry in self.inner.sources.iter() {
            let config = Arc::clone(entry.value());
            if !config.active
                || config.settings.interval_secs == 0
                || !config.settings.sync_reservations
            {
                continue;
            }

            let orchestrator = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(sync_task(orchestrator, config, cancel)));
        }

        info!(tasks = handles.len(), "periodic sync tasks started");
    }

    /// Cancel in-flight cycles and join all background tasks.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("orchestrator shut down");
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn lookup(&self, name: &str) -> Result<Arc<SourceConfig>, CoreError> {
        self.inner
            .sources
            .get(name)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| CoreError::UnknownSource { name: name.into() })
    }

    fn cycle_lock(&self, name: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            &self
                .inner
                .cycle_locks
                .entry(name.to_owned())
                .or_default(),
        )
    }
}

// ── Background task ──────────────────────────────────────────────────

/// Periodically sync one source until cancelled.
async fn sync_task(
    orchestrator: SyncOrchestrator,
    config: Arc<SourceConfig>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(config.settings.interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = orchestrator.sync_source(&config.name).await {
                    warn!(source = %config.name, error = %e, "periodic sync failed");
                }
            }
        }
    }
}
