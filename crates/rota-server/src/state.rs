use std::sync::Arc;

use rota_core::Rotator;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub rotator: Arc<Rotator>,
}

impl AppState {
    pub fn new(rotator: Arc<Rotator>) -> Self {
        Self { rotator }
    }
}
