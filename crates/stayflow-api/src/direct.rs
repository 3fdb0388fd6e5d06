// Direct-booking API client.
//
// Our own booking engine, so the wire shape is the closest to canonical:
// single spellings, RFC 3339 datetimes, a `{ bookings, total }` envelope.

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::auth::RequestAuth;
use crate::error::Error;
use crate::http::{check_status, decode_json, send_error};
use crate::transport::TransportConfig;

// ── Wire models ──────────────────────────────────────────────────────

/// `{ "bookings": [...], "total": n }`
#[derive(Debug, Deserialize)]
pub struct DirectEnvelope {
    #[serde(default = "Vec::new")]
    pub bookings: Vec<DirectBooking>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One booking from `/bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectBooking {
    pub id: String,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default)]
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

pub struct DirectClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl DirectClient {
    pub fn new(
        base_url: Url,
        auth: &RequestAuth,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(auth.headers()?)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Fetch bookings for the next `window_days` days.
    pub async fn fetch_bookings(&self, window_days: u32) -> Result<Vec<DirectBooking>, Error> {
        let url = self.base_url.join("bookings")?;
        debug!(%url, window_days, "GET direct bookings");

        let resp = self
            .http
            .get(url)
            .query(&[("window_days", window_days.to_string())])
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        let envelope: DirectEnvelope = decode_json(resp).await?;
        Ok(envelope.bookings)
    }

    /// Lightweight health probe against /health.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = self.base_url.join("health")?;
        debug!(%url, "GET direct health");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        check_status(resp).await.map(|_| ())
    }
}
