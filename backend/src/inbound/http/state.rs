//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on the domain's
//! driving port, so tests can swap in any [`ContactRelay`].

use std::sync::Arc;

use crate::domain::ports::ContactRelay;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Relay that forwards contact submissions.
    pub relay: Arc<dyn ContactRelay>,
}

impl HttpState {
    /// Bundle the relay port for handlers.
    pub fn new(relay: Arc<dyn ContactRelay>) -> Self {
        Self { relay }
    }
}
