//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **mail**: SMTP delivery of composed contact emails via lettre
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
