// Property-management-system client.
//
// Bearer-token auth, `{ status, message, data }` envelope, date-windowed
// reservation export at /api/reservations. PMS installs are frequently
// on-premise, so this is the one client where self-signed TLS shows up.

pub mod client;
pub mod types;

pub use client::PmsClient;
