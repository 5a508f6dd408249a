use forge_core::{CopyStatus, ProgramType};
use forge_db::entities::{cardio_programs, community_programs, programs};
use forge_migration::Migrator;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use uuid::Uuid;

/// Fresh migrated in-memory database. One connection so every query sees the same memory db.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn seed_snapshot(db: &DatabaseConnection, kind: ProgramType, data: Value) -> Uuid {
    let id = Uuid::new_v4();
    community_programs::ActiveModel {
        id: Set(id),
        name: Set("Published program".to_string()),
        program_type: Set(kind.as_str().to_string()),
        program_data: Set(data),
        published_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

/// Shell record as the enqueuer would create it.
pub async fn seed_program(db: &DatabaseConnection, kind: ProgramType, status: CopyStatus) -> Uuid {
    let id = Uuid::new_v4();
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    match kind {
        ProgramType::Strength => {
            programs::ActiveModel {
                id: Set(id),
                user_id: Set("user_1".to_string()),
                name: Set("My copy".to_string()),
                copy_status: Set(status.to_string()),
                clone_lease_id: Set(None),
                clone_lease_expires_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await
            .unwrap();
        }
        ProgramType::Cardio => {
            cardio_programs::ActiveModel {
                id: Set(id),
                user_id: Set("user_1".to_string()),
                name: Set("My copy".to_string()),
                copy_status: Set(status.to_string()),
                clone_lease_id: Set(None),
                clone_lease_expires_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(db)
            .await
            .unwrap();
        }
    }
    id
}

/// `weeks` weeks of `workouts` workouts, each with `exercises` exercises of `sets` sets.
pub fn strength_snapshot(weeks: usize, workouts: usize, exercises: usize, sets: usize) -> Value {
    let weeks: Vec<Value> = (0..weeks)
        .map(|w| {
            let workouts: Vec<Value> = (0..workouts)
                .map(|d| {
                    let exercises: Vec<Value> = (0..exercises)
                        .map(|e| {
                            let sets: Vec<Value> = (0..sets)
                                .map(|s| {
                                    json!({
                                        "setNumber": s + 1,
                                        "reps": 8,
                                        "weight": if s == 0 { Value::Null } else { json!(60.5) },
                                        "rpe": 7.5,
                                    })
                                })
                                .collect();
                            json!({
                                "name": format!("Exercise {e}"),
                                "exerciseDefinitionId": format!("exdef_{e}"),
                                "order": e,
                                "exerciseGroup": if e % 2 == 0 { json!("A") } else { Value::Null },
                                "prescribedSets": sets,
                            })
                        })
                        .collect();
                    json!({
                        "name": format!("Day {}", d + 1),
                        "dayNumber": d + 1,
                        "exercises": exercises,
                    })
                })
                .collect();
            json!({ "weekNumber": w + 1, "workouts": workouts })
        })
        .collect();
    json!({ "weeks": weeks })
}

/// One cardio week per entry, with that many sessions.
pub fn cardio_snapshot(sessions_per_week: &[usize]) -> Value {
    let weeks: Vec<Value> = sessions_per_week
        .iter()
        .enumerate()
        .map(|(w, &count)| {
            let sessions: Vec<Value> = (0..count)
                .map(|s| {
                    json!({
                        "dayNumber": s + 1,
                        "name": format!("Week {} run {}", w + 1, s + 1),
                        "targetDuration": 30 + 5 * s,
                        "intensityZone": 2,
                        "equipment": "treadmill",
                        "targetHRRange": { "min": 130, "max": 145 },
                        "intervalStructure": [{ "work": 60, "rest": 30, "repeats": 4 }],
                    })
                })
                .collect();
            json!({ "weekNumber": w + 1, "sessions": sessions })
        })
        .collect();
    json!({ "weeks": weeks })
}
