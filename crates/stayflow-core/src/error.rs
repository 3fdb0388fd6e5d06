// ── Core error types ──
//
// Domain-facing errors from stayflow-core. Consumers never see raw
// transport errors -- the `From<stayflow_api::Error>` impl translates
// them into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    /// An operation named a source that is not configured. Surfaced
    /// immediately; no partial work is attempted.
    #[error("Unknown source: {name}")]
    UnknownSource { name: String },

    #[error("Source '{name}' is not active")]
    SourceInactive { name: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Transport errors (fatal per cycle) ───────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach endpoint: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Per-record errors ────────────────────────────────────────────
    /// A canonical booking failed validation before reconciliation was
    /// attempted. Counted as an error in the sync report, never
    /// silently dropped.
    #[error("Invalid record '{external_id}': {reason}")]
    RecordInvalid { external_id: String, reason: String },

    #[error("Room not found: {identifier}")]
    RoomNotFound { identifier: String },

    #[error("Reservation not found: {identifier}")]
    ReservationNotFound { identifier: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error aborts a whole sync cycle (transport-level)
    /// as opposed to a single record.
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. }
                | Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::Api { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stayflow_api::Error> for CoreError {
    fn from(err: stayflow_api::Error) -> Self {
        match err {
            stayflow_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            stayflow_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            stayflow_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            stayflow_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            stayflow_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            stayflow_api::Error::Vendor { message } => CoreError::Api {
                message,
                status: None,
            },
            stayflow_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
