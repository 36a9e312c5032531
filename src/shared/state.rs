use crate::config::AppConfig;
use crate::payments::gateway::GatewayVerifier;
use crate::shared::utils::DbPool;
use std::sync::Arc;

pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    pub gateway: Arc<dyn GatewayVerifier>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            config: self.config.clone(),
            gateway: Arc::clone(&self.gateway),
        }
    }
}
