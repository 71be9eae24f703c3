//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use portfolio_backend::inbound::http::listen_config::{AllowedOrigins, ListenSettings};

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: AllowedOrigins,
}

impl ServerConfig {
    /// Construct a server configuration that accepts any browser origin.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            allowed_origins: AllowedOrigins::Any,
        }
    }

    /// Restrict cross-origin browser access.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: AllowedOrigins) -> Self {
        self.allowed_origins = origins;
        self
    }
}

impl From<ListenSettings> for ServerConfig {
    fn from(settings: ListenSettings) -> Self {
        Self::new(settings.bind_addr).with_allowed_origins(settings.allowed_origins)
    }
}
