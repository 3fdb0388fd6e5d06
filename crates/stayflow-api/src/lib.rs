// stayflow-api: raw HTTP clients for external booking channels.
//
// One client per source kind (PMS, OTA, channel manager, direct booking).
// Each client owns its vendor's wire models and envelope quirks; callers
// receive unwrapped payloads. Normalization into canonical bookings lives
// in `stayflow-core` — this crate never interprets vendor field semantics
// beyond deserialization.

pub mod auth;
pub mod channel;
pub mod direct;
pub mod error;
mod http;
pub mod ota;
pub mod pms;
pub mod transport;

pub use auth::RequestAuth;
pub use channel::ChannelClient;
pub use direct::DirectClient;
pub use error::Error;
pub use ota::OtaClient;
pub use pms::PmsClient;
pub use transport::{TlsMode, TransportConfig};
