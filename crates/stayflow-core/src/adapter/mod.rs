// ── Source adapters ──
//
// The sealed normalization boundary: one implementation per source
// kind, each wrapping its channel client and owning its own
// field-precedence rules. The canonical booking is the only shape the
// rest of the system ever sees.

mod channel;
mod direct;
mod ota;
mod pms;

pub use channel::ChannelAdapter;
pub use direct::DirectAdapter;
pub use ota::OtaAdapter;
pub use pms::PmsAdapter;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};

use stayflow_api::{RequestAuth, TransportConfig};

use crate::error::CoreError;
use crate::model::{CanonicalBooking, SourceConfig, SourceCredentials, SourceKind};

/// A configured external booking channel: fetch a normalized batch, or
/// probe the endpoint's health.
#[async_trait]
pub trait BookingSource: Send + Sync {
    /// Fetch the source's time-windowed batch and normalize every
    /// record into the canonical shape. A transport failure here is
    /// fatal for the calling sync cycle and must propagate.
    async fn fetch(&self) -> Result<Vec<CanonicalBooking>, CoreError>;

    /// Lightweight health probe; never touches reservation data.
    async fn probe(&self) -> Result<(), CoreError>;
}

/// Build the adapter matching a source's kind.
pub fn for_config(
    config: &SourceConfig,
    transport: &TransportConfig,
) -> Result<Box<dyn BookingSource>, CoreError> {
    match config.kind {
        SourceKind::Pms => Ok(Box::new(PmsAdapter::from_config(config, transport)?)),
        SourceKind::Ota => Ok(Box::new(OtaAdapter::from_config(config, transport)?)),
        SourceKind::ChannelManager => {
            Ok(Box::new(ChannelAdapter::from_config(config, transport)?))
        }
        SourceKind::Direct => Ok(Box::new(DirectAdapter::from_config(config, transport)?)),
    }
}

// ── Shared normalization helpers ─────────────────────────────────────

/// Translate domain credentials into transport-layer auth.
pub(crate) fn request_auth(credentials: &SourceCredentials) -> RequestAuth {
    match credentials {
        SourceCredentials::Bearer { token } => RequestAuth::Bearer {
            token: token.clone(),
        },
        SourceCredentials::ApiKeyPair {
            api_key,
            secret_key,
        } => RequestAuth::ApiKeyPair {
            api_key: api_key.clone(),
            secret_key: secret_key.clone(),
        },
    }
}

/// The property/hotel identifier, mandatory for OTA and channel-manager
/// sources.
pub(crate) fn require_property_id(config: &SourceConfig) -> Result<String, CoreError> {
    config.property_id.clone().ok_or_else(|| CoreError::Config {
        message: format!("source '{}' requires a property_id", config.name),
    })
}

/// Today through `days` days ahead, the fetch window for a cycle.
pub(crate) fn fetch_window(days: u32) -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let end = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(today);
    (today, end)
}

/// Parse a vendor timestamp: RFC 3339 first, then the common
/// date-time and date-only layouts, all interpreted as UTC.
pub(crate) fn parse_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Like [`parse_instant`], but missing or malformed values collapse to
/// the epoch. The resulting inverted/degenerate interval fails booking
/// validation downstream and is counted as a per-record error instead
/// of being silently dropped.
pub(crate) fn instant_or_epoch(raw: Option<&str>) -> DateTime<Utc> {
    parse_instant(raw).unwrap_or(DateTime::UNIX_EPOCH)
}
