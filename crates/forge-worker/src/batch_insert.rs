//! Writes one snapshot week into the destination tree.
//!
//! Every identifier is generated up front, so each tier (week, workouts, exercises,
//! sets / sessions) goes out as a single multi-row insert in parent-before-child
//! order. Round trips per week are bounded by the tier count, not the node count.

use std::time::Instant;

use forge_core::snapshot::{CardioWeek, StrengthWeek};
use forge_db::entities::{cardio_sessions, cardio_weeks, exercises, prescribed_sets, program_weeks, workouts};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

/// Rows per INSERT statement. Keeps large tiers under driver bind-parameter limits.
pub const MAX_ROWS_PER_STATEMENT: usize = 1000;

/// Where a week is written to and who owns it.
#[derive(Debug, Clone, Copy)]
pub struct Destination<'a> {
    pub program_id: Uuid,
    pub owner_user_id: &'a str,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TierCounts {
    pub weeks: u64,
    pub workouts: u64,
    pub exercises: u64,
    pub sets: u64,
    pub sessions: u64,
}

impl std::ops::AddAssign for TierCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.weeks += rhs.weeks;
        self.workouts += rhs.workouts;
        self.exercises += rhs.exercises;
        self.sets += rhs.sets;
        self.sessions += rhs.sessions;
    }
}

async fn insert_tier<A, C>(conn: &C, rows: Vec<A>) -> Result<u64, DbErr>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(0);
    }

    let mut written = 0;
    let mut rows = rows.into_iter();
    loop {
        let chunk: Vec<A> = rows.by_ref().take(MAX_ROWS_PER_STATEMENT).collect();
        if chunk.is_empty() {
            break;
        }
        written += <A::Entity as EntityTrait>::insert_many(chunk)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(written)
}

pub async fn insert_strength_week<C: ConnectionTrait>(
    conn: &C,
    week: &StrengthWeek,
    dest: Destination<'_>,
) -> Result<TierCounts, DbErr> {
    let started = Instant::now();
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let owner = dest.owner_user_id.to_string();
    let week_id = Uuid::new_v4();

    let mut workout_rows = Vec::with_capacity(week.workouts.len());
    let mut exercise_rows = Vec::new();
    let mut set_rows = Vec::new();

    for workout in &week.workouts {
        let workout_id = Uuid::new_v4();
        workout_rows.push(workouts::ActiveModel {
            id: Set(workout_id),
            week_id: Set(week_id),
            user_id: Set(owner.clone()),
            name: Set(workout.name.clone()),
            day_number: Set(workout.day_number),
            created_at: Set(now),
        });

        for exercise in &workout.exercises {
            let exercise_id = Uuid::new_v4();
            exercise_rows.push(exercises::ActiveModel {
                id: Set(exercise_id),
                workout_id: Set(workout_id),
                user_id: Set(owner.clone()),
                exercise_definition_id: Set(exercise.exercise_definition_id.clone()),
                name: Set(exercise.name.clone()),
                position: Set(exercise.order),
                exercise_group: Set(exercise.exercise_group.clone()),
                notes: Set(exercise.notes.clone()),
                created_at: Set(now),
            });

            set_rows.extend(exercise.prescribed_sets.iter().map(|set| prescribed_sets::ActiveModel {
                id: Set(Uuid::new_v4()),
                exercise_id: Set(exercise_id),
                set_number: Set(set.set_number),
                reps: Set(set.reps),
                weight: Set(set.weight),
                rpe: Set(set.rpe),
                rir: Set(set.rir),
                created_at: Set(now),
            }));
        }
    }

    let week_row = program_weeks::ActiveModel {
        id: Set(week_id),
        program_id: Set(dest.program_id),
        user_id: Set(owner),
        week_number: Set(week.week_number),
        created_at: Set(now),
    };

    let counts = TierCounts {
        weeks: insert_tier(conn, vec![week_row]).await?,
        workouts: insert_tier(conn, workout_rows).await?,
        exercises: insert_tier(conn, exercise_rows).await?,
        sets: insert_tier(conn, set_rows).await?,
        sessions: 0,
    };

    tracing::info!(
        week_number = week.week_number,
        workouts = counts.workouts,
        exercises = counts.exercises,
        sets = counts.sets,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "strength week written"
    );
    Ok(counts)
}

pub async fn insert_cardio_week<C: ConnectionTrait>(
    conn: &C,
    week: &CardioWeek,
    dest: Destination<'_>,
) -> Result<TierCounts, DbErr> {
    let started = Instant::now();
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let owner = dest.owner_user_id.to_string();
    let week_id = Uuid::new_v4();

    let session_rows: Vec<cardio_sessions::ActiveModel> = week
        .sessions
        .iter()
        .map(|session| cardio_sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            week_id: Set(week_id),
            user_id: Set(owner.clone()),
            day_number: Set(session.day_number),
            name: Set(session.name.clone()),
            description: Set(session.description.clone()),
            target_duration: Set(session.target_duration),
            intensity_zone: Set(session.intensity_zone),
            equipment: Set(session.equipment.clone()),
            target_hr_range: Set(session.target_hr_range.clone()),
            target_power_range: Set(session.target_power_range.clone()),
            interval_structure: Set(session.interval_structure.clone()),
            notes: Set(session.notes.clone()),
            created_at: Set(now),
        })
        .collect();

    let week_row = cardio_weeks::ActiveModel {
        id: Set(week_id),
        cardio_program_id: Set(dest.program_id),
        user_id: Set(owner),
        week_number: Set(week.week_number),
        created_at: Set(now),
    };

    let counts = TierCounts {
        weeks: insert_tier(conn, vec![week_row]).await?,
        sessions: insert_tier(conn, session_rows).await?,
        ..TierCounts::default()
    };

    tracing::info!(
        week_number = week.week_number,
        sessions = counts.sessions,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "cardio week written"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use forge_core::{CardioSnapshot, CopyStatus, ProgramType, StrengthSnapshot};
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait};

    use super::*;
    use crate::test_support::{cardio_snapshot, seed_program, strength_snapshot, test_db};

    #[tokio::test]
    async fn strength_tiers_have_multiplied_counts() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Strength, CopyStatus::Cloning).await;
        let snapshot = StrengthSnapshot::from_json(strength_snapshot(1, 3, 4, 5)).unwrap();
        let dest = Destination {
            program_id,
            owner_user_id: "user_9",
        };

        let counts = insert_strength_week(&db, &snapshot.weeks[0], dest).await.unwrap();
        assert_eq!(
            counts,
            TierCounts {
                weeks: 1,
                workouts: 3,
                exercises: 12,
                sets: 60,
                sessions: 0,
            }
        );

        assert_eq!(workouts::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(exercises::Entity::find().count(&db).await.unwrap(), 12);
        assert_eq!(prescribed_sets::Entity::find().count(&db).await.unwrap(), 60);

        let week = program_weeks::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(week.program_id, program_id);
        assert_eq!(week.user_id, "user_9");
        let owned = exercises::Entity::find()
            .filter(exercises::Column::UserId.eq("user_9"))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(owned, 12);
    }

    #[tokio::test]
    async fn optional_fields_pass_through_as_null() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Strength, CopyStatus::Cloning).await;
        let snapshot = StrengthSnapshot::from_json(strength_snapshot(1, 1, 2, 2)).unwrap();
        let dest = Destination {
            program_id,
            owner_user_id: "u",
        };
        insert_strength_week(&db, &snapshot.weeks[0], dest).await.unwrap();

        let exercises = exercises::Entity::find()
            .order_by_asc(exercises::Column::Position)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(exercises[0].exercise_group.as_deref(), Some("A"));
        assert_eq!(exercises[1].exercise_group, None);
        assert_eq!(exercises[0].notes, None);

        let sets = prescribed_sets::Entity::find()
            .filter(prescribed_sets::Column::ExerciseId.eq(exercises[0].id))
            .order_by_asc(prescribed_sets::Column::SetNumber)
            .all(&db)
            .await
            .unwrap();
        assert_eq!(sets[0].weight, None);
        assert_eq!(sets[1].weight, Some(60.5));
        assert_eq!(sets[1].rpe, Some(7.5));
        assert_eq!(sets[1].rir, None);
    }

    #[tokio::test]
    async fn empty_tiers_are_skipped() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Strength, CopyStatus::Cloning).await;
        let dest = Destination {
            program_id,
            owner_user_id: "u",
        };

        let no_workouts = StrengthSnapshot::from_json(strength_snapshot(1, 0, 0, 0)).unwrap();
        let counts = insert_strength_week(&db, &no_workouts.weeks[0], dest).await.unwrap();
        assert_eq!(counts.weeks, 1);
        assert_eq!(counts.workouts, 0);

        let no_exercises = StrengthSnapshot::from_json(strength_snapshot(1, 2, 0, 0)).unwrap();
        let counts = insert_strength_week(&db, &no_exercises.weeks[0], dest).await.unwrap();
        assert_eq!(counts.workouts, 2);
        assert_eq!(counts.exercises, 0);
        assert_eq!(counts.sets, 0);
    }

    #[tokio::test]
    async fn large_tiers_are_chunked() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Strength, CopyStatus::Cloning).await;
        // 10 * 30 * 4 = 1200 sets, more than one statement's worth
        let snapshot = StrengthSnapshot::from_json(strength_snapshot(1, 10, 30, 4)).unwrap();
        let dest = Destination {
            program_id,
            owner_user_id: "u",
        };

        let counts = insert_strength_week(&db, &snapshot.weeks[0], dest).await.unwrap();
        assert_eq!(counts.sets, 1200);
        assert_eq!(prescribed_sets::Entity::find().count(&db).await.unwrap(), 1200);
    }

    #[tokio::test]
    async fn cardio_week_writes_sessions_verbatim() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Cardio, CopyStatus::Cloning).await;
        let snapshot = CardioSnapshot::from_json(cardio_snapshot(&[2])).unwrap();
        let dest = Destination {
            program_id,
            owner_user_id: "u",
        };

        let counts = insert_cardio_week(&db, &snapshot.weeks[0], dest).await.unwrap();
        assert_eq!(counts.weeks, 1);
        assert_eq!(counts.sessions, 2);

        let session = cardio_sessions::Entity::find()
            .filter(cardio_sessions::Column::DayNumber.eq(1))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let source = &snapshot.weeks[0].sessions[0];
        assert_eq!(session.name, source.name);
        assert_eq!(session.target_duration, source.target_duration);
        assert_eq!(session.target_hr_range, source.target_hr_range);
        assert_eq!(session.interval_structure, source.interval_structure);
        assert_eq!(session.target_power_range, None);
        assert_eq!(session.description, None);
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_nothing() {
        let db = test_db().await;
        let program_id = seed_program(&db, ProgramType::Strength, CopyStatus::Cloning).await;
        let snapshot = StrengthSnapshot::from_json(strength_snapshot(1, 2, 2, 2)).unwrap();
        let dest = Destination {
            program_id,
            owner_user_id: "u",
        };

        let txn = db.begin().await.unwrap();
        insert_strength_week(&txn, &snapshot.weeks[0], dest).await.unwrap();
        txn.rollback().await.unwrap();

        assert_eq!(program_weeks::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(prescribed_sets::Entity::find().count(&db).await.unwrap(), 0);
    }
}
