// OTA adapter: 30-day window, split guest names on newer API versions.

use async_trait::async_trait;

use stayflow_api::ota::OtaBooking;
use stayflow_api::{OtaClient, TransportConfig};

use super::{
    fetch_window, instant_or_epoch, parse_instant, request_auth, require_property_id,
    BookingSource,
};
use crate::error::CoreError;
use crate::model::{BookingStatus, CanonicalBooking, SourceConfig};
use crate::status::map_vendor_status;

const WINDOW_DAYS: u32 = 30;

#[derive(Debug)]
pub struct OtaAdapter {
    client: OtaClient,
    source: String,
    days_ahead: u32,
}

impl OtaAdapter {
    pub fn from_config(
        config: &SourceConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let auth = request_auth(&config.credentials);
        let property_id = require_property_id(config)?;
        let client = OtaClient::new(config.endpoint.clone(), property_id, &auth, transport)?;
        Ok(Self {
            client,
            source: config.name.clone(),
            days_ahead: config.days_ahead_or(WINDOW_DAYS),
        })
    }

    fn normalize(&self, raw: OtaBooking) -> CanonicalBooking {
        // Joined name wins; otherwise compose from the split fields.
        let guest_name = raw.guest_name.unwrap_or_else(|| {
            let first = raw.guest_first_name.unwrap_or_default();
            let last = raw.guest_last_name.unwrap_or_default();
            format!("{first} {last}").trim().to_owned()
        });

        let guest_count = match (raw.num_adults, raw.num_children) {
            (None, None) => 1,
            (adults, children) => adults.unwrap_or(0) + children.unwrap_or(0),
        };

        CanonicalBooking {
            external_id: raw.booking_id.or(raw.id).unwrap_or_default(),
            source: self.source.clone(),
            guest_name,
            guest_email: raw.guest_email.unwrap_or_default(),
            guest_phone: raw.guest_phone.unwrap_or_default(),
            room_type: raw.room_type.or(raw.room_type_code).unwrap_or_default(),
            room_number: None,
            check_in: instant_or_epoch(raw.checkin.as_deref().or(raw.check_in_date.as_deref())),
            check_out: instant_or_epoch(
                raw.checkout.as_deref().or(raw.check_out_date.as_deref()),
            ),
            guest_count,
            total_amount: raw.price_total.unwrap_or(0.0),
            currency: raw.currency_code.unwrap_or_else(|| "USD".into()),
            status: raw
                .status
                .as_deref()
                .map_or(BookingStatus::Confirmed, map_vendor_status),
            booked_at: parse_instant(raw.booked_at.as_deref()),
            special_requests: raw.remarks.unwrap_or_default(),
            metadata: raw.extra,
        }
    }
}

#[async_trait]
impl BookingSource for OtaAdapter {
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError> {
        let (from, to) = fetch_window(self.days_ahead);
        let raw = self.client.fetch_bookings(from, to).await?;
        Ok(raw.into_iter().map(|r| self.normalize(r)).collect())
    }

    async fn probe(&self) -> Result<(), CoreError> {
        self.client.probe().await.map_err(Into::into)
    }
}
