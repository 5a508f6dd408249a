//! Per-job clone state machine.
//!
//! terminal check -> lease -> idempotency check -> (already complete | partial | week loop)
//! -> ready. Weeks are written strictly in snapshot order, one transaction each, so
//! the number of destination weeks is an exact progress marker on redelivery.

use std::time::Duration;

use forge_core::snapshot::{CardioWeek, MAX_WORKOUTS_PER_WEEK, StrengthWeek};
use forge_core::{CardioSnapshot, CloneJob, CopyStatus, ProgramType, StrengthSnapshot};
use forge_db::entities::community_programs;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::batch_insert::{self, Destination, TierCounts};
use crate::error::CloneError;
use crate::progress;

const LEASE_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneSettings {
    /// Upper bound for one week's inserts. The commit runs outside it.
    pub week_timeout: Duration,
}

impl Default for CloneSettings {
    fn default() -> Self {
        Self {
            week_timeout: Duration::from_secs(30),
        }
    }
}

impl CloneSettings {
    /// Covers one week plus the status writes around it. Every status write made
    /// under the lease pushes the expiry out again.
    fn lease_ttl(&self) -> Duration {
        self.week_timeout.saturating_add(LEASE_SLACK)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned { weeks: usize, rows: TierCounts },
    /// A previous delivery already wrote every week.
    AlreadyComplete { weeks: usize },
    /// The destination was marked failed earlier; nothing was touched.
    AlreadyFailed,
}

enum Weeks {
    Strength(Vec<StrengthWeek>),
    Cardio(Vec<CardioWeek>),
}

impl Weeks {
    fn len(&self) -> usize {
        match self {
            Weeks::Strength(w) => w.len(),
            Weeks::Cardio(w) => w.len(),
        }
    }
}

async fn load_snapshot(db: &DatabaseConnection, job: &CloneJob) -> Result<Weeks, CloneError> {
    let row = community_programs::Entity::find_by_id(job.snapshot_id)
        .one(db)
        .await?
        .ok_or(CloneError::SnapshotNotFound(job.snapshot_id))?;

    if row.program_type != job.program_type.as_str() {
        return Err(CloneError::SnapshotTypeMismatch {
            snapshot_id: job.snapshot_id,
            expected: job.program_type,
            found: row.program_type,
        });
    }

    Ok(match job.program_type {
        ProgramType::Strength => Weeks::Strength(StrengthSnapshot::from_json(row.program_data)?.weeks),
        ProgramType::Cardio => Weeks::Cardio(CardioSnapshot::from_json(row.program_data)?.weeks),
    })
}

/// Copy the job's snapshot into its destination program.
///
/// Safe to call again for a job that already completed. Errors leave the
/// destination either `failed` or at its last `cloning_week_*` status; see
/// [`CloneError::marks_failed`] for what callers should do about the latter.
pub async fn clone_program(
    db: &DatabaseConnection,
    job: &CloneJob,
    settings: &CloneSettings,
) -> Result<CloneOutcome, CloneError> {
    let kind = job.program_type;
    let program_id = job.destination_program_id;

    let weeks = load_snapshot(db, job).await?;

    match progress::read_status(db, kind, program_id).await? {
        None => return Err(CloneError::DestinationNotFound(program_id)),
        Some(CopyStatus::Failed) => {
            tracing::warn!(%program_id, "destination already failed, not cloning again");
            return Ok(CloneOutcome::AlreadyFailed);
        }
        Some(_) => {}
    }

    let lease_id = Uuid::new_v4();
    if !progress::claim_lease(db, kind, program_id, lease_id, settings.lease_ttl()).await? {
        return Err(CloneError::InProgress(program_id));
    }

    let result = run_claimed(db, job, settings, lease_id, &weeks).await;

    if let Err(err) = progress::release_lease(db, kind, program_id, lease_id).await {
        // Expires on its own.
        tracing::warn!(%err, %program_id, "failed to release clone lease");
    }

    result
}

async fn run_claimed(
    db: &DatabaseConnection,
    job: &CloneJob,
    settings: &CloneSettings,
    lease_id: Uuid,
    weeks: &Weeks,
) -> Result<CloneOutcome, CloneError> {
    let kind = job.program_type;
    let program_id = job.destination_program_id;
    let total = weeks.len();
    let ttl = settings.lease_ttl();
    let write_status = move |status: CopyStatus| {
        progress::write_status_leased(db, kind, program_id, lease_id, status, ttl)
    };

    let existing = progress::count_weeks(db, kind, program_id).await?;
    if existing == total as u64 {
        tracing::info!(%program_id, weeks = total, "all weeks already present, marking ready");
        if !write_status(CopyStatus::Ready).await? {
            return Err(CloneError::LeaseLost(program_id));
        }
        return Ok(CloneOutcome::AlreadyComplete { weeks: total });
    }
    if existing > 0 {
        progress::mark_failed(db, kind, program_id).await;
        return Err(CloneError::PartialClone {
            existing,
            expected: total as u64,
        });
    }

    let dest = Destination {
        program_id,
        owner_user_id: &job.owner_user_id,
    };
    let mut rows = TierCounts::default();

    for index in 0..total {
        if let Weeks::Strength(strength) = weeks {
            let week = &strength[index];
            if week.workouts.len() > MAX_WORKOUTS_PER_WEEK {
                progress::mark_failed(db, kind, program_id).await;
                return Err(CloneError::TooManyWorkouts {
                    week_number: week.week_number,
                    count: week.workouts.len(),
                    max: MAX_WORKOUTS_PER_WEEK,
                });
            }
        }

        let status = CopyStatus::CloningWeek {
            week: index as u32 + 1,
            total: total as u32,
        };
        if !write_status(status).await? {
            tracing::warn!(%program_id, week = index + 1, "clone lease lost, stopping");
            return Err(CloneError::LeaseLost(program_id));
        }

        rows += write_week(db, weeks, index, dest, settings.week_timeout).await?;
    }

    // Kept apart from the loop so a failure here is distinguishable in logs.
    match write_status(CopyStatus::Ready).await {
        Ok(true) => {}
        Ok(false) => return Err(CloneError::LeaseLost(program_id)),
        Err(err) => return Err(CloneError::Finalize(err)),
    }

    tracing::info!(
        %program_id,
        weeks = total,
        workouts = rows.workouts,
        exercises = rows.exercises,
        sets = rows.sets,
        sessions = rows.sessions,
        "program cloned"
    );
    Ok(CloneOutcome::Cloned { weeks: total, rows })
}

async fn write_week(
    db: &DatabaseConnection,
    weeks: &Weeks,
    index: usize,
    dest: Destination<'_>,
    timeout: Duration,
) -> Result<TierCounts, CloneError> {
    let inserts = async {
        let txn = db.begin().await?;
        if txn.get_database_backend() == DbBackend::Postgres {
            txn.execute_unprepared(&format!(
                "SET LOCAL statement_timeout = {}",
                timeout.as_millis()
            ))
            .await?;
        }

        let counts = match weeks {
            Weeks::Strength(w) => batch_insert::insert_strength_week(&txn, &w[index], dest).await?,
            Weeks::Cardio(w) => batch_insert::insert_cardio_week(&txn, &w[index], dest).await?,
        };

        Ok::<_, sea_orm::DbErr>((txn, counts))
    };

    // Dropping the transaction on timeout rolls the week back.
    let (txn, counts) = match tokio::time::timeout(timeout, inserts).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(CloneError::WeekTimeout {
                week: index as u32 + 1,
                timeout,
            });
        }
    };

    // Not under the timer: the database may apply a commit whose reply arrives late.
    txn.commit().await?;
    Ok(counts)
}
