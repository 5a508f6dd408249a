//! Bridges message-transport deliveries to the orchestrator and maps the result back
//! onto transport acknowledgement.

pub mod pull;
pub mod push;

use forge_core::CloneJob;
use sea_orm::DatabaseConnection;
use tracing::Instrument;

use crate::orchestrator::{self, CloneOutcome, CloneSettings};
use crate::progress;

/// What the transport should do with a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Done (or nothing left to do).
    Ack,
    /// Bad input; redelivering cannot help.
    Reject,
    /// Redeliver later.
    Retry,
}

/// Run one job to completion and decide how the delivery is acknowledged.
pub async fn process_job(db: &DatabaseConnection, settings: &CloneSettings, job: &CloneJob) -> Disposition {
    let span = tracing::info_span!(
        "clone_job",
        program_id = %job.destination_program_id,
        snapshot_id = %job.snapshot_id,
        program_type = %job.program_type,
    );

    async move {
        tracing::info!(user_id = %job.owner_user_id, "clone job received");

        match orchestrator::clone_program(db, job, settings).await {
            Ok(outcome) => {
                match outcome {
                    CloneOutcome::Cloned { weeks, rows } => tracing::info!(
                        weeks,
                        workouts = rows.workouts,
                        sessions = rows.sessions,
                        "clone job completed"
                    ),
                    CloneOutcome::AlreadyComplete { weeks } => {
                        tracing::info!(weeks, "clone job already completed earlier")
                    }
                    CloneOutcome::AlreadyFailed => {
                        tracing::warn!("clone job skipped, destination already failed")
                    }
                }
                Disposition::Ack
            }
            Err(err) => {
                tracing::error!(%err, permanent = err.is_permanent(), "clone job failed");
                if err.marks_failed() {
                    progress::mark_failed(db, job.program_type, job.destination_program_id).await;
                }
                if err.is_permanent() {
                    Disposition::Reject
                } else {
                    Disposition::Retry
                }
            }
        }
    }
    .instrument(span)
    .await
}
