use std::sync::Arc;

use forge_db::sea_orm::DatabaseConnection;

use crate::orchestrator::CloneSettings;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub settings: CloneSettings,
}
