//! HTTP inbound adapter exposing the contact relay and health probes.

pub mod contact;
pub mod error;
pub mod health;
pub mod listen_config;
pub mod state;
pub mod validation;

pub use error::ApiResult;
