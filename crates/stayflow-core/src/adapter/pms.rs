// PMS adapter: 60-day window, dual field spellings from older installs.

use async_trait::async_trait;

use stayflow_api::pms::types::PmsReservation;
use stayflow_api::{PmsClient, TransportConfig};

use super::{fetch_window, instant_or_epoch, parse_instant, request_auth, BookingSource};
use crate::error::CoreError;
use crate::model::{CanonicalBooking, SourceConfig};
use crate::status::map_vendor_status;

const WINDOW_DAYS: u32 = 60;

pub struct PmsAdapter {
    client: PmsClient,
    source: String,
    days_ahead: u32,
}

impl PmsAdapter {
    pub fn from_config(
        config: &SourceConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let auth = request_auth(&config.credentials);
        let client = PmsClient::new(config.endpoint.clone(), &auth, transport)?;
        Ok(Self {
            client,
            source: config.name.clone(),
            days_ahead: config.days_ahead_or(WINDOW_DAYS),
        })
    }

    /// Field precedence: the modern spelling wins, the legacy one fills
    /// in (`id` over `reservation_id`, `checkin_date` over
    /// `arrival_date`, ...). Missing optionals default to empty.
    fn normalize(&self, raw: PmsReservation) -> CanonicalBooking {
        CanonicalBooking {
            external_id: raw.id.or(raw.reservation_id).unwrap_or_default(),
            source: self.source.clone(),
            guest_name: raw.guest_name.or(raw.customer_name).unwrap_or_default(),
            guest_email: raw.guest_email.or(raw.email).unwrap_or_default(),
            guest_phone: raw.guest_phone.or(raw.phone).unwrap_or_default(),
            room_type: raw.room_type.or(raw.room_type_name).unwrap_or_default(),
            room_number: raw.room_number,
            check_in: instant_or_epoch(
                raw.checkin_date.as_deref().or(raw.arrival_date.as_deref()),
            ),
            check_out: instant_or_epoch(
                raw.checkout_date
                    .as_deref()
                    .or(raw.departure_date.as_deref()),
            ),
            guest_count: raw.guest_count.or(raw.num_guests).unwrap_or(1),
            total_amount: raw.total_amount.or(raw.total).unwrap_or(0.0),
            currency: raw.currency.unwrap_or_else(|| "USD".into()),
            status: raw
                .status
                .as_deref()
                .map_or(crate::model::BookingStatus::Confirmed, map_vendor_status),
            booked_at: parse_instant(raw.created_at.as_deref()),
            special_requests: raw.special_requests.unwrap_or_default(),
            metadata: raw.extra,
        }
    }
}

#[async_trait]
impl BookingSource for PmsAdapter {
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError> {
        let (from, to) = fetch_window(self.days_ahead);
        let raw = self.client.fetch_reservations(from, to).await?;
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
    use crate::model::{BookingStatus, SourceCredentials, SourceKind, SyncSettings};
    use secrecy::SecretString;

    fn adapter() -> PmsAdapter {
        let config = SourceConfig {
            name: "pms".into(),
            kind: SourceKind::Pms,
            endpoint: "https://pms.example.com".parse().unwrap(),
            credentials: SourceCredentials::Bearer {
                token: SecretString::from("t"),
            },
            protocol_version: "v1".into(),
            active: true,
            settings: SyncSettings::default(),
            property_id: None,
        };
        PmsAdapter::from_config(&config, &TransportConfig::default()).unwrap()
    }

    fn raw(json: serde_json::Value) -> PmsReservation {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn modern_spellings_take_precedence() {
        let booking = adapter().normalize(raw(serde_json::json!({
            "id": "R1",
            "reservation_id": "LEGACY",
            "guest_name": "Ada Lovelace",
            "guest_email": "ada@example.com",
            "checkin_date": "2024-07-10",
            "arrival_date": "2099-01-01",
            "checkout_date": "2024-07-12",
            "room_type": "Deluxe",
            "status": "booked"
        })));

        assert_eq!(booking.external_id, "R1");
        assert_eq!(booking.check_in.to_rfc3339(), "2024-07-10T00:00:00+00:00");
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn legacy_spellings_fill_in() {
        let booking = adapter().normalize(raw(serde_json::json!({
            "reservation_id": "L7",
            "customer_name": "Grace Hopper",
            "email": "grace@example.com",
            "phone": "+1 555 0100",
            "arrival_date": "2024-07-10",
            "departure_date": "2024-07-12",
            "room_type_name": "Suite",
            "num_guests": 3,
            "total": 900.5,
            "status": "in_house"
        })));

        assert_eq!(booking.external_id, "L7");
        assert_eq!(booking.guest_name, "Grace Hopper");
        assert_eq!(booking.guest_phone, "+1 555 0100");
        assert_eq!(booking.room_type, "Suite");
        assert_eq!(booking.guest_count, 3);
        assert!((booking.total_amount - 900.5).abs() < f64::EPSILON);
        assert_eq!(booking.status, BookingStatus::CheckedIn);
    }

    #[test]
    fn missing_optionals_default_to_empty() {
        let booking = adapter().normalize(raw(serde_json::json!({
            "id": "R2",
            "checkin_date": "2024-07-10",
            "checkout_date": "2024-07-12"
        })));

        assert_eq!(booking.guest_phone, "");
        assert_eq!(booking.special_requests, "");
        assert_eq!(booking.guest_count, 1);
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn unknown_fields_land_in_metadata() {
        let booking = adapter().normalize(raw(serde_json::json!({
            "id": "R3",
            "checkin_date": "2024-07-10",
            "checkout_date": "2024-07-12",
            "loyalty_tier": "gold"
        })));

        assert_eq!(booking.metadata["loyalty_tier"], "gold");
    }
}
