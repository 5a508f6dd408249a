//! Pull-subscription delivery against the Pub/Sub emulator's REST surface.
//!
//! Only used where push delivery cannot reach the worker (local development).

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{Disposition, process_job};
use crate::config::PullConfig;
use crate::state::AppState;

const SUBSCRIPTION_WAIT_ATTEMPTS: u32 = 30;
const SUBSCRIPTION_WAIT_INTERVAL: Duration = Duration::from_secs(1);
const PULL_ERROR_BACKOFF: Duration = Duration::from_secs(1);
const PULL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("subscription {subscription} not found after {attempts} attempts")]
    SubscriptionMissing { subscription: String, attempts: u32 },
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: StatusCode, url: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PullRequest {
    max_messages: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    #[serde(default)]
    received_messages: Vec<ReceivedMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceivedMessage {
    ack_id: String,
    #[serde(default)]
    message: PubsubMessage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PubsubMessage {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AckRequest<'a> {
    ack_ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyAckDeadlineRequest<'a> {
    ack_ids: &'a [String],
    ack_deadline_seconds: u32,
}

#[derive(Clone)]
pub struct PullSubscriber {
    http: reqwest::Client,
    subscription_url: String,
    subscription: String,
    state: AppState,
    wait_attempts: u32,
    wait_interval: Duration,
}

impl PullSubscriber {
    pub fn new(config: &PullConfig, state: AppState) -> Result<Self, DeliveryError> {
        let host = config.emulator_host.trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };

        Ok(Self {
            http: reqwest::Client::builder().timeout(PULL_TIMEOUT).build()?,
            subscription_url: format!(
                "{base}/v1/projects/{}/subscriptions/{}",
                config.project_id, config.subscription
            ),
            subscription: config.subscription.clone(),
            state,
            wait_attempts: SUBSCRIPTION_WAIT_ATTEMPTS,
            wait_interval: SUBSCRIPTION_WAIT_INTERVAL,
        })
    }

    /// The emulator may still be creating topics when the worker boots.
    pub async fn wait_for_subscription(&self) -> Result<(), DeliveryError> {
        for attempt in 1..=self.wait_attempts {
            match self.http.get(&self.subscription_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(subscription = %self.subscription, attempt, "subscription ready");
                    return Ok(());
                }
                Ok(resp) => {
                    tracing::debug!(status = %resp.status(), attempt, "subscription not ready");
                }
                Err(err) => {
                    tracing::debug!(%err, attempt, "emulator not reachable yet");
                }
            }
            if attempt < self.wait_attempts {
                tokio::time::sleep(self.wait_interval).await;
            }
        }

        Err(DeliveryError::SubscriptionMissing {
            subscription: self.subscription.clone(),
            attempts: self.wait_attempts,
        })
    }

    pub fn spawn(self) {
        tokio::spawn(async move {
            if let Err(err) = self.wait_for_subscription().await {
                tracing::error!(%err, "pull delivery disabled");
                return;
            }
            loop {
                if let Err(err) = self.pull_once().await {
                    tracing::warn!(%err, "pull failed");
                    tokio::time::sleep(PULL_ERROR_BACKOFF).await;
                }
            }
        });
    }

    /// Pull and handle at most one message. Returns how many were handled.
    pub async fn pull_once(&self) -> Result<usize, DeliveryError> {
        let url = format!("{}:pull", self.subscription_url);
        let resp = self
            .http
            .post(&url)
            .json(&PullRequest { max_messages: 1 })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(DeliveryError::UnexpectedStatus {
                status: resp.status(),
                url,
            });
        }
        let pulled: PullResponse = resp.json().await?;

        let handled = pulled.received_messages.len();
        for received in pulled.received_messages {
            self.handle(received).await?;
        }
        Ok(handled)
    }

    async fn handle(&self, received: ReceivedMessage) -> Result<(), DeliveryError> {
        let message_id = received.message.message_id.unwrap_or_default();
        let data = received.message.data.unwrap_or_default();

        let job = match forge_core::job::decode_message_data(&data) {
            Ok(job) => job,
            Err(err) => {
                // Never retried: redelivery would fail the same way.
                tracing::warn!(%err, %message_id, "dropping malformed message");
                return self.ack(&received.ack_id).await;
            }
        };

        match process_job(&self.state.db, &self.state.settings, &job).await {
            Disposition::Ack | Disposition::Reject => self.ack(&received.ack_id).await,
            Disposition::Retry => self.nack(&received.ack_id).await,
        }
    }

    async fn ack(&self, ack_id: &str) -> Result<(), DeliveryError> {
        let ack_ids = [ack_id.to_string()];
        self.post(":acknowledge", &AckRequest { ack_ids: &ack_ids })
            .await
    }

    /// Zero ack deadline makes the message immediately available for redelivery.
    async fn nack(&self, ack_id: &str) -> Result<(), DeliveryError> {
        let ack_ids = [ack_id.to_string()];
        self.post(
            ":modifyAckDeadline",
            &ModifyAckDeadlineRequest {
                ack_ids: &ack_ids,
                ack_deadline_seconds: 0,
            },
        )
        .await
    }

    async fn post<T: Serialize>(&self, verb: &str, body: &T) -> Result<(), DeliveryError> {
        let url = format!("{}{verb}", self.subscription_url);
        let resp = self.http.post(&url).json(body).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(DeliveryError::UnexpectedStatus {
                status: resp.status(),
                url,
            });
        }
        Ok(())
    }
}
