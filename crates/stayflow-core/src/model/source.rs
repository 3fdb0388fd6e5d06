// ── Source configuration ──
//
// One SourceConfig per external system. Created and edited by an
// administrator; read-only to this core at run time. Loaded once per
// orchestrator start, refreshable on demand.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// The kind of external system a source talks to. Determines which
/// channel client and normalization path handle it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    Pms,
    Ota,
    ChannelManager,
    Direct,
}

/// Credential material for a source.
///
/// Mirrors `stayflow_api::RequestAuth` but lives in the domain model so
/// config loading does not depend on the transport crate's types.
#[derive(Debug, Clone)]
pub enum SourceCredentials {
    Bearer { token: SecretString },
    ApiKeyPair {
        api_key: SecretString,
        secret_key: SecretString,
    },
}

/// Per-source sync tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Seconds between periodic sync cycles. 0 disables the timer task;
    /// the source can still be synced on demand.
    pub interval_secs: u64,
    /// How many days forward to fetch. 0 means the adapter default.
    pub days_ahead: u32,
    /// Facet flags: which data families this source syncs.
    pub sync_reservations: bool,
    pub sync_availability: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            days_ahead: 0,
            sync_reservations: true,
            sync_availability: false,
        }
    }
}

/// Configuration for one external booking channel.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Unique name, the key for every per-source operation.
    pub name: String,
    pub kind: SourceKind,
    pub endpoint: Url,
    pub credentials: SourceCredentials,
    pub protocol_version: String,
    pub active: bool,
    pub settings: SyncSettings,
    /// Property/hotel identifier required by OTA and channel-manager
    /// endpoints.
    pub property_id: Option<String>,
}

impl SourceConfig {
    /// Effective fetch window in days, falling back to the adapter
    /// default when unset.
    pub fn days_ahead_or(&self, adapter_default: u32) -> u32 {
        if self.settings.days_ahead == 0 {
            adapter_default
        } else {
            self.settings.days_ahead
        }
    }
}
