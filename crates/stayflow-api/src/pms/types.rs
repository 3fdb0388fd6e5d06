// PMS wire models.
//
// Field presence varies across PMS versions, so `#[serde(default)]` is
// used liberally. Several fields exist under two spellings depending on
// the installed version; both are modeled and precedence is applied
// downstream during normalization.

use serde::Deserialize;

/// Standard PMS response envelope.
///
/// ```json
/// { "status": "ok", "message": null, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct PmsEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// One reservation row from `/api/reservations`.
#[derive(Debug, Clone, Deserialize)]
pub struct PmsReservation {
    #[serde(default)]
    pub id: Option<String>,
    /// Older installs export `reservation_id` instead of `id`.
    #[serde(default)]
    pub reservation_id: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub guest_phone: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub room_type_name: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub checkin_date: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub checkout_date: Option<String>,
    #[serde(default)]
    pub departure_date: Option<String>,
    #[serde(default)]
    pub guest_count: Option<u32>,
    #[serde(default)]
    pub num_guests: Option<u32>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
