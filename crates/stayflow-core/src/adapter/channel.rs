// Channel-manager adapter: 45-day window, channel-manager vocabulary
// (arrival/departure, pax, state).

use async_trait::async_trait;

use stayflow_api::channel::ChannelReservation;
use stayflow_api::{ChannelClient, TransportConfig};

use super::{
    fetch_window, instant_or_epoch, parse_instant, request_auth, require_property_id,
    BookingSource,
};
use crate::error::CoreError;
use crate::model::{BookingStatus, CanonicalBooking, SourceConfig};
use crate::status::map_vendor_status;

const WINDOW_DAYS: u32 = 45;

pub struct ChannelAdapter {
    client: ChannelClient,
    source: String,
    days_ahead: u32,
}

impl ChannelAdapter {
    pub fn from_config(
        config: &SourceConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let auth = request_auth(&config.credentials);
        let hotel_id = require_property_id(config)?;
        let client = ChannelClient::new(config.endpoint.clone(), hotel_id, &auth, transport)?;
        Ok(Self {
            client,
            source: config.name.clone(),
            days_ahead: config.days_ahead_or(WINDOW_DAYS),
        })
    }

    fn normalize(&self, raw: ChannelReservation) -> CanonicalBooking {
        let mut metadata = raw.extra;
        if let Some(origin) = raw.origin_channel {
            metadata.insert("origin_channel".into(), origin.into());
        }

        CanonicalBooking {
            external_id: raw.reservation_code.unwrap_or_default(),
            source: self.source.clone(),
            guest_name: raw.client_name.unwrap_or_default(),
            guest_email: raw.client_email.unwrap_or_default(),
            guest_phone: raw.client_phone.unwrap_or_default(),
            room_type: raw.room_category.unwrap_or_default(),
            room_number: raw.room_number,
            check_in: instant_or_epoch(raw.arrival.as_deref()),
            check_out: instant_or_epoch(raw.departure.as_deref()),
            guest_count: raw.pax.unwrap_or(1),
            total_amount: raw.amount.unwrap_or(0.0),
            currency: raw.currency.unwrap_or_else(|| "USD".into()),
            status: raw
                .state
                .as_deref()
                .map_or(BookingStatus::Confirmed, map_vendor_status),
            booked_at: parse_instant(raw.booked_on.as_deref()),
            special_requests: raw.comments.unwrap_or_default(),
            metadata,
        }
    }
}

#[async_trait]
impl BookingSource for ChannelAdapter {
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError> {
        let (from, to) = fetch_window(self.days_ahead);
        let raw = self.client.export_reservations(from, to).await?;
        Ok(raw.into_iter().map(|r| self.normalize(r)).collect())
    }

    async fn probe(&self) -> Result<(), CoreError> {
        self.client.probe().await.map_err(Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{SourceCredentials, SourceKind, SyncSettings};
    use secrecy::SecretString;

    fn adapter() -> ChannelAdapter {
        let config = SourceConfig {
            name: "cm".into(),
            kind: SourceKind::ChannelManager,
            endpoint: "https://cm.example.com".parse().unwrap(),
            credentials: SourceCredentials::Bearer {
                token: SecretString::from("t"),
            },
            protocol_version: "v1".into(),
            active: true,
            settings: SyncSettings::default(),
            property_id: Some("HOTEL-1".into()),
        };
        ChannelAdapter::from_config(&config, &TransportConfig::default()).unwrap()
    }

    #[test]
    fn channel_vocabulary_normalizes() {
        let raw: ChannelReservation = serde_json::from_value(serde_json::json!({
            "reservation_code": "CM-77",
            "client_name": "Jo Guest",
            "client_email": "jo@example.com",
            "room_category": "standard",
            "arrival": "2024-07-10",
            "departure": "2024-07-12",
            "pax": 2,
            "amount": 250.0,
            "currency": "EUR",
            "state": "canceled",
            "origin_channel": "big-ota"
        }))
        .unwrap();

        let booking = adapter().normalize(raw);

        assert_eq!(booking.external_id, "CM-77");
        assert_eq!(booking.room_type, "standard");
        assert_eq!(booking.guest_count, 2);
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.metadata["origin_channel"], "big-ota");
    }
}
