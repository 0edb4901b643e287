/// Application state
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServiceConfig;
use crate::domain::Clock;

#[derive(Clone)]
pub struct AppState {
    pub service_config: ServiceConfig,
    pub postgres: Option<PgPool>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        service_config: ServiceConfig,
        postgres: Option<PgPool>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service_config,
            postgres,
            clock,
        }
    }
}
