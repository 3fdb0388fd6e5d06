// PMS HTTP client
//
// Wraps `reqwest::Client` with bearer auth, the `{ status, data }`
// envelope, and date-windowed reservation queries. The envelope is
// stripped before the caller sees the payload.

use chrono::NaiveDate;
use tracing::debug;
use url::Url;

use crate::auth::RequestAuth;
use crate::error::Error;
use crate::http::{decode_json, send_error};
use crate::pms::types::{PmsEnvelope, PmsReservation};
use crate::transport::TransportConfig;

pub struct PmsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl PmsClient {
    /// Create a new PMS client. Auth headers are baked into the
    /// underlying `reqwest::Client` as defaults.
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

    /// The configured endpoint root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch reservations whose check-in falls inside `[from, to]`.
    pub async fn fetch_reservations(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PmsReservation>, Error> {
        let url = self.base_url.join("api/reservations")?;
        debug!(%url, %from, %to, "GET pms reservations");

        let resp = self
            .http
            .get(url)
            .query(&[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        let envelope: PmsEnvelope<PmsReservation> = decode_json(resp).await?;

        if envelope.status != "ok" {
            return Err(Error::Vendor {
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("status={}", envelope.status)),
            });
        }

        Ok(envelope.data)
    }

    /// Lightweight health probe. Succeeds on any 2xx from /api/health.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = self.base_url.join("api/health")?;
        debug!(%url, "GET pms health");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs))?;

        crate::http::check_status(resp).await.map(|_| ())
    }
}
