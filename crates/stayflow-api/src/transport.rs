// Shared transport configuration for building reqwest::Client instances.
//
// All four channel clients share timeout and TLS settings through this
// module, avoiding duplicated builder logic. Auth headers are injected
// per client via `build_client_with_headers`.

use std::time::Duration;

/// TLS verification mode.
#[derive(Debug, Clone, Copy, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Accept any certificate (for on-premise PMS installs behind
    /// self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
///
/// Every outbound adapter call carries this bounded timeout — no call in
/// the sync path may block indefinitely.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        self.build_client_with_headers(reqwest::header::HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by every channel client to inject its auth headers
    /// (`Authorization: Bearer ...` or the `X-API-Key`/`X-Secret-Key` pair).
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("stayflow/0.1.0")
            .default_headers(headers);

        if let TlsMode::DangerAcceptInvalid = self.tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(crate::error::Error::Transport)
    }

    /// The configured timeout in whole seconds, for error reporting.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs()
    }
}
