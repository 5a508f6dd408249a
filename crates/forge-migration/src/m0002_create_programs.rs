use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Programs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Programs::UserId).string().not_null())
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(
                        ColumnDef::new(Programs::CopyStatus)
                            .string()
                            .not_null()
                            .default("ready"),
                    )
                    .col(
                        ColumnDef::new(Programs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Programs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProgramWeeks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgramWeeks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProgramWeeks::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(ProgramWeeks::UserId).string().not_null())
                    .col(ColumnDef::new(ProgramWeeks::WeekNumber).integer().not_null())
                    .col(
                        ColumnDef::new(ProgramWeeks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_weeks_program")
                            .from(ProgramWeeks::Table, ProgramWeeks::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workouts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Workouts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Workouts::WeekId).uuid().not_null())
                    .col(ColumnDef::new(Workouts::UserId).string().not_null())
                    .col(ColumnDef::new(Workouts::Name).string().not_null())
                    .col(ColumnDef::new(Workouts::DayNumber).integer().not_null())
                    .col(
                        ColumnDef::new(Workouts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workouts_week")
                            .from(Workouts::Table, Workouts::WeekId)
                            .to(ProgramWeeks::Table, ProgramWeeks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Exercises::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Exercises::WorkoutId).uuid().not_null())
                    .col(ColumnDef::new(Exercises::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Exercises::ExerciseDefinitionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exercises::Name).string().not_null())
                    .col(ColumnDef::new(Exercises::Position).integer().not_null())
                    .col(ColumnDef::new(Exercises::ExerciseGroup).string().null())
                    .col(ColumnDef::new(Exercises::Notes).text().null())
                    .col(
                        ColumnDef::new(Exercises::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exercises_workout")
                            .from(Exercises::Table, Exercises::WorkoutId)
                            .to(Workouts::Table, Workouts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PrescribedSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrescribedSets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrescribedSets::ExerciseId).uuid().not_null())
                    .col(ColumnDef::new(PrescribedSets::SetNumber).integer().not_null())
                    .col(ColumnDef::new(PrescribedSets::Reps).integer().not_null())
                    .col(ColumnDef::new(PrescribedSets::Weight).double().null())
                    .col(ColumnDef::new(PrescribedSets::Rpe).double().null())
                    .col(ColumnDef::new(PrescribedSets::Rir).integer().null())
                    .col(
                        ColumnDef::new(PrescribedSets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prescribed_sets_exercise")
                            .from(PrescribedSets::Table, PrescribedSets::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Child lookups by parent id; program_weeks(program_id) also backs the
        // idempotency count.
        manager
            .create_index(
                Index::create()
                    .name("idx_program_weeks_program_id")
                    .table(ProgramWeeks::Table)
                    .col(ProgramWeeks::ProgramId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workouts_week_id")
                    .table(Workouts::Table)
                    .col(Workouts::WeekId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_workout_id")
                    .table(Exercises::Table)
                    .col(Exercises::WorkoutId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prescribed_sets_exercise_id")
                    .table(PrescribedSets::Table)
                    .col(PrescribedSets::ExerciseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PrescribedSets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProgramWeeks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Programs {
    Table,
    Id,
    UserId,
    Name,
    CopyStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProgramWeeks {
    Table,
    Id,
    ProgramId,
    UserId,
    WeekNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Workouts {
    Table,
    Id,
    WeekId,
    UserId,
    Name,
    DayNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Exercises {
    Table,
    Id,
    WorkoutId,
    UserId,
    ExerciseDefinitionId,
    Name,
    Position,
    ExerciseGroup,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PrescribedSets {
    Table,
    Id,
    ExerciseId,
    SetNumber,
    Reps,
    Weight,
    Rpe,
    Rir,
    CreatedAt,
}
