use thiserror::Error;

/// Top-level error type for the `stayflow-api` crate.
///
/// Covers every failure mode across all channel clients: authentication,
/// transport, vendor envelope errors, and payload decoding.
/// `stayflow-core` maps these into domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the remote endpoint (401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Remote API ──────────────────────────────────────────────────
    /// Non-2xx HTTP response. Fatal for the current sync cycle of the
    /// source that produced it.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose vendor envelope signals failure
    /// (e.g. `{ "status": "error", ... }`).
    #[error("Vendor error: {message}")]
    Vendor { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next sync cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns `true` if the remote endpoint rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Api { status: 401 | 403, .. }
        )
    }
}
