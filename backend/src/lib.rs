//! Mail relay backend for a personal portfolio site.
//!
//! Contact form submissions arrive over HTTP, are validated in the
//! [`domain`], and are forwarded to the site owner through the SMTP adapter
//! in [`outbound`]. The [`client`] module implements the form's submission
//! flow for tools and tests.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
