// ── Sync audit log ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only audit entry per completed (or failed) sync
/// operation. The detail payload is structured JSON: counts on success,
/// the error chain on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub source: String,
    pub operation: String,
    pub detail: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

impl SyncLogEntry {
    pub fn new(
        source: impl Into<String>,
        operation: impl Into<String>,
        detail: serde_json::Value,
        success: bool,
    ) -> Self {
        Self {
            source: source.into(),
            operation: operation.into(),
            detail,
            timestamp: Utc::now(),
            success,
        }
    }
}
