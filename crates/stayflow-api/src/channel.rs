// Channel-manager client.
//
// Channel managers aggregate multiple OTAs behind one export endpoint.
// The export is a POST with a JSON date window and returns a flat array
// (no envelope). Field names follow the channel-manager convention
// (arrival/departure, pax, state) rather than the OTA one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::auth::RequestAuth;
use crate::error::Error;
use crate::http::{check_status, decode_json, send_error};
use crate::transport::TransportConfig;

// ── Wire models ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ExportRequest<'a> {
    hotel_id: &'a str,
    date_from: String,
    date_to: String,
}

/// One reservation from `/channel/export`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelReservation {
    #[serde(default)]
    pub reservation_code: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub room_category: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub pax: Option<u32>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub booked_on: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    /// Which OTA the channel manager sourced this from, when reported.
    #[serde(default)]
    pub origin_channel: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

pub struct ChannelClient {
    http: reqwest::Client,
    base_url: Url,
    hotel_id: String,
    timeout_secs: u64,
}

impl ChannelClient {
    pub fn new(
        base_url: Url,
        hotel_id: String,
        auth: &RequestAuth,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(auth.headers()?)?;
        Ok(Self {
            http,
            base_url,
            hotel_id,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Export reservations with arrival inside `[from, to]`.
    pub async fn export_reservations(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ChannelReservation>, Error> {
        let url = self.base_url.join("channel/export")?;
        debug!(%url, %from, %to, hotel = %self.hotel_id, "POST channel export");

        let body = ExportRequest {
            hotel_id: &self.hotel_id,
            date_from: from.format("%Y-%m-%d").to_string(),
            date_to: to.format("%Y-%m-%d").to_string(),
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        decode_json(resp).await
    }

    /// Lightweight health probe against /channel/status.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = self.base_url.join("channel/status")?;
        debug!(%url, "GET channel status");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        check_status(resp).await.map(|_| ())
    }
}
