// === PUBLIC CONTRACT ===
// Only the contract module is meant for other modules to consume.
pub mod contract;

pub use contract::{client, error, model};

// === INTERNAL MODULES ===
// Exposed for the server binary and integration tests; external consumers
// should stick to the `contract` module.
pub mod api;
pub mod config;
pub mod domain;
pub mod gateways;
pub mod infra;
