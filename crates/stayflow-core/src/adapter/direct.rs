// Direct-booking adapter: our own engine, single spellings, 30-day
// window.

use async_trait::async_trait;

use stayflow_api::direct::DirectBooking;
use stayflow_api::{DirectClient, TransportConfig};

use super::{instant_or_epoch, parse_instant, request_auth, BookingSource};
use crate::error::CoreError;
use crate::model::{BookingStatus, CanonicalBooking, SourceConfig};
use crate::status::map_vendor_status;

const WINDOW_DAYS: u32 = 30;

pub struct DirectAdapter {
    client: DirectClient,
    source: String,
    days_ahead: u32,
}

impl DirectAdapter {
    pub fn from_config(
        config: &SourceConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let auth = request_auth(&config.credentials);
        let client = DirectClient::new(config.endpoint.clone(), &auth, transport)?;
        Ok(Self {
            client,
            source: config.name.clone(),
            days_ahead: config.days_ahead_or(WINDOW_DAYS),
        })
    }

    fn normalize(&self, raw: DirectBooking) -> CanonicalBooking {
        CanonicalBooking {
            external_id: raw.id,
            source: self.source.clone(),
            guest_name: raw.guest_name.unwrap_or_default(),
            guest_email: raw.guest_email.unwrap_or_default(),
            guest_phone: raw.guest_phone.unwrap_or_default(),
            room_type: raw.room_type.unwrap_or_default(),
            room_number: raw.room_number,
            check_in: instant_or_epoch(raw.check_in.as_deref()),
            check_out: instant_or_epoch(raw.check_out.as_deref()),
            guest_count: raw.guests.unwrap_or(1),
            total_amount: raw.total_amount.unwrap_or(0.0),
            currency: raw.currency.unwrap_or_else(|| "USD".into()),
            status: raw
                .status
                .as_deref()
                .map_or(BookingStatus::Confirmed, map_vendor_status),
            booked_at: parse_instant(raw.created_at.as_deref()),
            special_requests: raw.special_requests.unwrap_or_default(),
            metadata: raw.extra,
        }
    }
}

#[async_trait]
impl BookingSource for DirectAdapter {
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError> {
        let raw = self.client.fetch_bookings(self.days_ahead).await?;
        Ok(raw.into_iter().map(|r| self.normalize(r)).collect())
    }

    async fn probe(&self) -> Result<(), CoreError> {
        self.client.probe().await.map_err(Into::into)
    }
}
