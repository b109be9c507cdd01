use deskhand_core::ChatService;
use std::sync::Arc;

use crate::integrations::IntegrationStore;

pub struct AppState {
    pub service: ChatService,
    pub integrations: Arc<dyn IntegrationStore>,
}

impl AppState {
    pub fn new(service: ChatService, integrations: Arc<dyn IntegrationStore>) -> Self {
        Self {
            service,
            integrations,
        }
    }
}
