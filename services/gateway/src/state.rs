use fleet_state::LogRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LogRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<LogRegistry>) -> Self {
        Self { registry }
    }
}
