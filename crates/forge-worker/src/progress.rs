//! Reads and writes on the destination program row: copy status, clone lease and
//! the count of weeks already written beneath it.

use std::time::Duration;

use forge_core::{CopyStatus, ProgramType};
use forge_db::entities::{cardio_programs, cardio_weeks, program_weeks, programs};
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::error::CloneError;

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

fn lease_expiry(ttl: Duration) -> sea_orm::prelude::DateTimeWithTimeZone {
    let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
    let now = chrono::Utc::now();
    now.checked_add_signed(ttl).unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC).into()
}

/// `Ok(None)` when the destination row does not exist.
pub async fn read_status<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
) -> Result<Option<CopyStatus>, CloneError> {
    let raw: Option<String> = match kind {
        ProgramType::Strength => {
            programs::Entity::find_by_id(program_id)
                .select_only()
                .column(programs::Column::CopyStatus)
                .into_tuple()
                .one(db)
                .await?
        }
        ProgramType::Cardio => {
            cardio_programs::Entity::find_by_id(program_id)
                .select_only()
                .column(cardio_programs::Column::CopyStatus)
                .into_tuple()
                .one(db)
                .await?
        }
    };

    Ok(raw.map(|s| s.parse::<CopyStatus>()).transpose()?)
}

pub async fn write_status<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
    status: CopyStatus,
) -> Result<(), DbErr> {
    let value = status.to_string();
    let updated = match kind {
        ProgramType::Strength => {
            programs::Entity::update_many()
                .col_expr(programs::Column::CopyStatus, Expr::value(value))
                .col_expr(programs::Column::UpdatedAt, Expr::value(now()))
                .filter(programs::Column::Id.eq(program_id))
                .exec(db)
                .await?
        }
        ProgramType::Cardio => {
            cardio_programs::Entity::update_many()
                .col_expr(cardio_programs::Column::CopyStatus, Expr::value(value))
                .col_expr(cardio_programs::Column::UpdatedAt, Expr::value(now()))
                .filter(cardio_programs::Column::Id.eq(program_id))
                .exec(db)
                .await?
        }
    };

    if updated.rows_affected == 0 {
        return Err(DbErr::RecordNotUpdated);
    }
    Ok(())
}

/// Write the status while holding the clone lease, pushing the lease expiry out by `ttl`.
///
/// `Ok(false)` means the lease is no longer ours (it expired and another delivery took
/// it over, or the row is gone); nothing was written.
pub async fn write_status_leased<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
    lease_id: Uuid,
    status: CopyStatus,
    ttl: Duration,
) -> Result<bool, DbErr> {
    let value = status.to_string();
    let expires_at = lease_expiry(ttl);
    let updated = match kind {
        ProgramType::Strength => {
            programs::Entity::update_many()
                .col_expr(programs::Column::CopyStatus, Expr::value(value))
                .col_expr(programs::Column::CloneLeaseExpiresAt, Expr::value(expires_at))
                .col_expr(programs::Column::UpdatedAt, Expr::value(now()))
                .filter(programs::Column::Id.eq(program_id))
                .filter(programs::Column::CloneLeaseId.eq(lease_id))
                .exec(db)
                .await?
        }
        ProgramType::Cardio => {
            cardio_programs::Entity::update_many()
                .col_expr(cardio_programs::Column::CopyStatus, Expr::value(value))
                .col_expr(
                    cardio_programs::Column::CloneLeaseExpiresAt,
                    Expr::value(expires_at),
                )
                .col_expr(cardio_programs::Column::UpdatedAt, Expr::value(now()))
                .filter(cardio_programs::Column::Id.eq(program_id))
                .filter(cardio_programs::Column::CloneLeaseId.eq(lease_id))
                .exec(db)
                .await?
        }
    };

    Ok(updated.rows_affected == 1)
}

/// Best-effort `failed` write used after a clone error. Never fails the caller.
pub async fn mark_failed<C: ConnectionTrait>(db: &C, kind: ProgramType, program_id: Uuid) {
    match write_status(db, kind, program_id, CopyStatus::Failed).await {
        Ok(()) => tracing::info!(%program_id, program_type = %kind, "destination marked failed"),
        Err(err) => {
            tracing::error!(%err, %program_id, program_type = %kind, "failed to mark destination failed")
        }
    }
}

pub async fn count_weeks<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
) -> Result<u64, DbErr> {
    match kind {
        ProgramType::Strength => {
            program_weeks::Entity::find()
                .filter(program_weeks::Column::ProgramId.eq(program_id))
                .count(db)
                .await
        }
        ProgramType::Cardio => {
            cardio_weeks::Entity::find()
                .filter(cardio_weeks::Column::CardioProgramId.eq(program_id))
                .count(db)
                .await
        }
    }
}

/// Atomically claim the clone lease on the destination row.
///
/// Succeeds when no lease is held or the held one has expired. Returns `false` when
/// another delivery holds a live lease (or the row is gone).
pub async fn claim_lease<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
    lease_id: Uuid,
    ttl: Duration,
) -> Result<bool, DbErr> {
    let now = now();
    let expires_at = lease_expiry(ttl);

    let updated = match kind {
        ProgramType::Strength => {
            programs::Entity::update_many()
                .col_expr(programs::Column::CloneLeaseId, Expr::value(lease_id))
                .col_expr(programs::Column::CloneLeaseExpiresAt, Expr::value(expires_at))
                .filter(programs::Column::Id.eq(program_id))
                .filter(
                    Condition::any()
                        .add(programs::Column::CloneLeaseId.is_null())
                        .add(programs::Column::CloneLeaseExpiresAt.is_null())
                        .add(programs::Column::CloneLeaseExpiresAt.lt(now)),
                )
                .exec(db)
                .await?
        }
        ProgramType::Cardio => {
            cardio_programs::Entity::update_many()
                .col_expr(cardio_programs::Column::CloneLeaseId, Expr::value(lease_id))
                .col_expr(
                    cardio_programs::Column::CloneLeaseExpiresAt,
                    Expr::value(expires_at),
                )
                .filter(cardio_programs::Column::Id.eq(program_id))
                .filter(
                    Condition::any()
                        .add(cardio_programs::Column::CloneLeaseId.is_null())
                        .add(cardio_programs::Column::CloneLeaseExpiresAt.is_null())
                        .add(cardio_programs::Column::CloneLeaseExpiresAt.lt(now)),
                )
                .exec(db)
                .await?
        }
    };

    Ok(updated.rows_affected == 1)
}

/// Release a lease this delivery holds. A lease taken over by someone else is left alone.
pub async fn release_lease<C: ConnectionTrait>(
    db: &C,
    kind: ProgramType,
    program_id: Uuid,
    lease_id: Uuid,
) -> Result<(), DbErr> {
    let null_uuid: Option<Uuid> = None;
    let null_ts: Option<sea_orm::prelude::DateTimeWithTimeZone> = None;

    match kind {
        ProgramType::Strength => {
            programs::Entity::update_many()
                .col_expr(programs::Column::CloneLeaseId, Expr::value(null_uuid))
                .col_expr(programs::Column::CloneLeaseExpiresAt, Expr::value(null_ts))
                .filter(programs::Column::Id.eq(program_id))
                .filter(programs::Column::CloneLeaseId.eq(lease_id))
                .exec(db)
                .await?;
        }
        ProgramType::Cardio => {
            cardio_programs::Entity::update_many()
                .col_expr(cardio_programs::Column::CloneLeaseId, Expr::value(null_uuid))
                .col_expr(cardio_programs::Column::CloneLeaseExpiresAt, Expr::value(null_ts))
                .filter(cardio_programs::Column::Id.eq(program_id))
                .filter(cardio_programs::Column::CloneLeaseId.eq(lease_id))
                .exec(db)
                .await?;
        }
    }

    Ok(())
}
