// Online-travel-agency client.
//
// OTA APIs authenticate with an X-API-Key/X-Secret-Key header pair and
// scope every query to a property id. Guest names arrive split into
// first/last on newer API versions and joined on older ones; both shapes
// are modeled.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::auth::RequestAuth;
use crate::error::Error;
use crate::http::{check_status, decode_json, send_error};
use crate::transport::TransportConfig;

// ── Wire models ──────────────────────────────────────────────────────

/// `{ "bookings": [...], "count": n }`
#[derive(Debug, Deserialize)]
pub struct OtaEnvelope {
    #[serde(default = "Vec::new")]
    pub bookings: Vec<OtaBooking>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// One booking from `/v2/bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct OtaBooking {
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_first_name: Option<String>,
    #[serde(default)]
    pub guest_last_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default)]
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub room_type_code: Option<String>,
    #[serde(default)]
    pub checkin: Option<String>,
    #[serde(default)]
    pub check_in_date: Option<String>,
    #[serde(default)]
    pub checkout: Option<String>,
    #[serde(default)]
    pub check_out_date: Option<String>,
    #[serde(default)]
    pub num_adults: Option<u32>,
    #[serde(default)]
    pub num_children: Option<u32>,
    #[serde(default)]
    pub price_total: Option<f64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub booked_at: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct OtaClient {
    http: reqwest::Client,
    base_url: Url,
    property_id: String,
    timeout_secs: u64,
}

impl OtaClient {
    pub fn new(
        base_url: Url,
        property_id: String,
        auth: &RequestAuth,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(auth.headers()?)?;
        Ok(Self {
            http,
            base_url,
            property_id,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Fetch bookings with check-in inside `[from, to]` for the
    /// configured property.
    pub async fn fetch_bookings(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<OtaBooking>, Error> {
        let url = self.base_url.join("v2/bookings")?;
        debug!(%url, %from, %to, property = %self.property_id, "GET ota bookings");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("checkin_from", from.format("%Y-%m-%d").to_string()),
                ("checkin_to", to.format("%Y-%m-%d").to_string()),
                ("property_id", self.property_id.clone()),
            ])
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        let envelope: OtaEnvelope = decode_json(resp).await?;
        Ok(envelope.bookings)
    }

    /// Lightweight health probe against /v2/ping.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = self.base_url.join("v2/ping")?;
        debug!(%url, "GET ota ping");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        check_status(resp).await.map(|_| ())
    }
}
