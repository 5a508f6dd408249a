use std::time::Duration;

use forge_core::{ProgramType, SnapshotError, StatusParseError};
use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("snapshot {0} not found")]
    SnapshotNotFound(Uuid),

    #[error("snapshot {snapshot_id} is a {found} program, job expects {expected}")]
    SnapshotTypeMismatch {
        snapshot_id: Uuid,
        expected: ProgramType,
        found: String,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("destination program {0} not found")]
    DestinationNotFound(Uuid),

    #[error("destination program has an unreadable status: {0}")]
    CorruptStatus(#[from] StatusParseError),

    #[error("destination program {0} is being cloned by another delivery")]
    InProgress(Uuid),

    #[error("clone lease on destination program {0} expired and was taken over")]
    LeaseLost(Uuid),

    #[error("week {week_number} has {count} workouts, at most {max} are allowed")]
    TooManyWorkouts {
        week_number: i32,
        count: usize,
        max: usize,
    },

    #[error("partial clone detected: {existing} of {expected} weeks already exist")]
    PartialClone { existing: u64, expected: u64 },

    #[error("week {week} did not commit within {timeout:?}")]
    WeekTimeout { week: u32, timeout: Duration },

    #[error("all weeks written but marking the program ready failed: {0}")]
    Finalize(#[source] DbErr),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl CloneError {
    /// Errors that will fail the same way on every redelivery.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            CloneError::SnapshotNotFound(_)
                | CloneError::SnapshotTypeMismatch { .. }
                | CloneError::Snapshot(_)
                | CloneError::DestinationNotFound(_)
                | CloneError::CorruptStatus(_)
        )
    }

    /// Whether the delivery layer should try to record `failed` on the destination.
    ///
    /// Never for `InProgress` or `LeaseLost`: another delivery owns the status.
    pub fn marks_failed(&self) -> bool {
        !matches!(
            self,
            CloneError::InProgress(_) | CloneError::LeaseLost(_) | CloneError::DestinationNotFound(_)
        )
    }
}
