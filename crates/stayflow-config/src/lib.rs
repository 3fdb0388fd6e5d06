//! Configuration for the stayflow daemon and CLI.
//!
//! TOML source profiles, credential resolution (env-var indirection +
//! plaintext fallback), and translation into
//! `stayflow_core::SourceConfig`. Administrators edit the TOML file or
//! call the orchestrator's `setup_source_config` at run time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stayflow_core::{SourceConfig, SourceCredentials, SourceKind, SyncSettings, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} for source '{source_name}': {reason}")]
    Validation {
        source_name: String,
        field: String,
        reason: String,
    },

    #[error("no credentials configured for source '{source_name}'")]
    NoCredentials { source_name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults applied to every source.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named source profiles.
    #[serde(default)]
    pub sources: HashMap<String, SourceProfile>,

    /// Room inventory seeded into the store at startup.
    #[serde(default)]
    pub rooms: Vec<RoomSeed>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed certs (on-premise PMS installs).
    #[serde(default)]
    pub insecure_tls: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            insecure_tls: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named source profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceProfile {
    pub kind: SourceKind,

    /// Endpoint root URL (e.g., "https://api.example-pms.com").
    pub endpoint: String,

    /// Auth scheme: "bearer" or "api_key_pair". Defaults by kind
    /// (OTAs use the key pair, everything else a bearer token).
    pub auth: Option<String>,

    /// Bearer token (plaintext — prefer token_env).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// API key / secret key (plaintext — prefer the _env variants).
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub secret_key: Option<String>,
    pub secret_key_env: Option<String>,

    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Seconds between periodic sync cycles. 0 = on-demand only.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Fetch window override in days. 0 = adapter default.
    #[serde(default)]
    pub days_ahead: u32,

    #[serde(default = "default_active")]
    pub sync_reservations: bool,

    #[serde(default)]
    pub sync_availability: bool,

    /// Property/hotel identifier (OTA and channel-manager kinds).
    pub property_id: Option<String>,
}

fn default_protocol_version() -> String {
    "v1".into()
}
fn default_active() -> bool {
    true
}
fn default_interval() -> u64 {
    900
}

/// One room in the seeded inventory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoomSeed {
    pub number: String,
    pub room_type: String,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "stayflow", "stayflow").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stayflow");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from a file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STAYFLOW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the given path.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve one secret through the chain: env-var indirection first,
/// then plaintext in the config file.
fn resolve_secret(
    env_name: Option<&str>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    if let Some(env_name) = env_name {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }
    plaintext.map(|v| SecretString::from(v.to_owned()))
}

/// Resolve a profile's credentials according to its auth scheme.
pub fn resolve_credentials(
    profile: &SourceProfile,
    source_name: &str,
) -> Result<SourceCredentials, ConfigError> {
    let scheme = profile.auth.clone().unwrap_or_else(|| match profile.kind {
        SourceKind::Ota => "api_key_pair".into(),
        _ => "bearer".into(),
    });

    match scheme.as_str() {
        "bearer" => {
            let token = resolve_secret(profile.token_env.as_deref(), profile.token.as_deref())
                .ok_or_else(|| ConfigError::NoCredentials {
                    source_name: source_name.into(),
                })?;
            Ok(SourceCredentials::Bearer { token })
        }
        "api_key_pair" => {
            let api_key =
                resolve_secret(profile.api_key_env.as_deref(), profile.api_key.as_deref());
            let secret_key = resolve_secret(
                profile.secret_key_env.as_deref(),
                profile.secret_key.as_deref(),
            );
            match (api_key, secret_key) {
                (Some(api_key), Some(secret_key)) => Ok(SourceCredentials::ApiKeyPair {
                    api_key,
                    secret_key,
                }),
                _ => Err(ConfigError::NoCredentials {
                    source_name: source_name.into(),
                }),
            }
        }
        other => Err(ConfigError::Validation {
            source_name: source_name.into(),
            field: "auth".into(),
            reason: format!("expected 'bearer' or 'api_key_pair', got '{other}'"),
        }),
    }
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `SourceConfig` from a named profile.
pub fn profile_to_source_config(
    source_name: &str,
    profile: &SourceProfile,
) -> Result<SourceConfig, ConfigError> {
    let endpoint: url::Url = profile
        .endpoint
        .parse()
        .map_err(|_| ConfigError::Validation {
            source_name: source_name.into(),
            field: "endpoint".into(),
            reason: format!("invalid URL: {}", profile.endpoint),
        })?;

    let credentials = resolve_credentials(profile, source_name)?;

    Ok(SourceConfig {
        name: source_name.to_owned(),
        kind: profile.kind,
        endpoint,
        credentials,
        protocol_version: profile.protocol_version.clone(),
        active: profile.active,
        settings: SyncSettings {
            interval_secs: profile.interval_secs,
            days_ahead: profile.days_ahead,
            sync_reservations: profile.sync_reservations,
            sync_availability: profile.sync_availability,
        },
        property_id: profile.property_id.clone(),
    })
}

/// Build every configured source, sorted by name for stable startup
/// ordering.
pub fn load_sources(config: &Config) -> Result<Vec<SourceConfig>, ConfigError> {
    let mut names: Vec<&String> = config.sources.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let profile = &config.sources[name];
            profile_to_source_config(name, profile)
        })
        .collect()
}

/// Build the shared transport config from the defaults section.
pub fn transport_from(config: &Config) -> TransportConfig {
    TransportConfig {
        tls: if config.defaults.insecure_tls {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(config.defaults.timeout_secs),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn profile(kind: SourceKind) -> SourceProfile {
        SourceProfile {
            kind,
            endpoint: "https://api.example.com".into(),
            auth: None,
            token: Some("plain-token".into()),
            token_env: None,
            api_key: Some("key".into()),
            api_key_env: None,
            secret_key: Some("secret".into()),
            secret_key_env: None,
            protocol_version: "v1".into(),
            active: true,
            interval_secs: 600,
            days_ahead: 0,
            sync_reservations: true,
            sync_availability: false,
            property_id: Some("H-1".into()),
        }
    }

    #[test]
    fn bearer_is_default_for_pms() {
        let creds = resolve_credentials(&profile(SourceKind::Pms), "pms").unwrap();
        match creds {
            SourceCredentials::Bearer { token } => {
                assert_eq!(token.expose_secret(), "plain-token");
            }
            SourceCredentials::ApiKeyPair { .. } => panic!("expected bearer"),
        }
    }

    #[test]
    fn key_pair_is_default_for_ota() {
        let creds = resolve_credentials(&profile(SourceKind::Ota), "ota").unwrap();
        assert!(matches!(creds, SourceCredentials::ApiKeyPair { .. }));
    }

    #[test]
    fn unset_env_indirection_falls_through_to_plaintext() {
        let mut p = profile(SourceKind::Pms);
        p.token_env = Some("STAYFLOW_TEST_TOKEN_THAT_IS_NEVER_SET".into());

        let creds = resolve_credentials(&p, "pms").unwrap();
        match creds {
            SourceCredentials::Bearer { token } => {
                assert_eq!(token.expose_secret(), "plain-token");
            }
            SourceCredentials::ApiKeyPair { .. } => panic!("expected bearer"),
        }
    }

    #[test]
    fn missing_credentials_error() {
        let mut p = profile(SourceKind::Pms);
        p.token = None;
        assert!(matches!(
            resolve_credentials(&p, "pms"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn unknown_auth_scheme_rejected() {
        let mut p = profile(SourceKind::Pms);
        p.auth = Some("oauth-dance".into());
        assert!(matches!(
            resolve_credentials(&p, "pms"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn invalid_endpoint_rejected() {
        let mut p = profile(SourceKind::Pms);
        p.endpoint = "not a url".into();
        assert!(matches!(
            profile_to_source_config("pms", &p),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.sources.insert("mypms".into(), profile(SourceKind::Pms));
        cfg.rooms.push(RoomSeed {
            number: "101".into(),
            room_type: "Deluxe".into(),
        });

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.sources.len(), 1);
        assert_eq!(loaded.sources["mypms"].kind, SourceKind::Pms);
        assert_eq!(loaded.rooms.len(), 1);
        assert_eq!(loaded.rooms[0].number, "101");
    }

    #[test]
    fn load_sources_is_name_sorted() {
        let mut cfg = Config::default();
        cfg.sources.insert("zeta".into(), profile(SourceKind::Pms));
        cfg.sources.insert("alpha".into(), profile(SourceKind::Direct));

        let sources = load_sources(&cfg).unwrap();
        assert_eq!(sources[0].name, "alpha");
        assert_eq!(sources[1].name, "zeta");
    }
}
