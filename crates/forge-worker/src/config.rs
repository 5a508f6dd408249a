use std::time::Duration;

use crate::orchestrator::CloneSettings;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PROJECT_ID: &str = "local-project";
const DEFAULT_SUBSCRIPTION: &str = "program-clone-worker";

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub port: u16,
    /// Set only when a local Pub/Sub emulator is in use; production is push-only.
    pub pull: Option<PullConfig>,
    pub settings: CloneSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullConfig {
    pub emulator_host: String,
    pub project_id: String,
    pub subscription: String,
}

impl WorkerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url =
            non_empty("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required"))?;

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        let pull = non_empty("PUBSUB_EMULATOR_HOST").map(|emulator_host| PullConfig {
            emulator_host,
            project_id: non_empty("PUBSUB_PROJECT_ID")
                .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string()),
            subscription: non_empty("CLONE_SUBSCRIPTION")
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION.to_string()),
        });

        let week_timeout_secs = non_empty("CLONE_WEEK_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30)
            .clamp(1, 600);

        Ok(Self {
            database_url,
            port,
            pull,
            settings: CloneSettings {
                week_timeout: Duration::from_secs(week_timeout_secs),
            },
        })
    }
}
