use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardioPrograms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardioPrograms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardioPrograms::UserId).string().not_null())
                    .col(ColumnDef::new(CardioPrograms::Name).string().not_null())
                    .col(
                        ColumnDef::new(CardioPrograms::CopyStatus)
                            .string()
                            .not_null()
                            .default("ready"),
                    )
                    .col(
                        ColumnDef::new(CardioPrograms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CardioPrograms::UpdatedAt)
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
                    .table(CardioWeeks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CardioWeeks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CardioWeeks::CardioProgramId).uuid().not_null())
                    .col(ColumnDef::new(CardioWeeks::UserId).string().not_null())
                    .col(ColumnDef::new(CardioWeeks::WeekNumber).integer().not_null())
                    .col(
                        ColumnDef::new(CardioWeeks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cardio_weeks_program")
                            .from(CardioWeeks::Table, CardioWeeks::CardioProgramId)
                            .to(CardioPrograms::Table, CardioPrograms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CardioSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardioSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardioSessions::WeekId).uuid().not_null())
                    .col(ColumnDef::new(CardioSessions::UserId).string().not_null())
                    .col(ColumnDef::new(CardioSessions::DayNumber).integer().not_null())
                    .col(ColumnDef::new(CardioSessions::Name).string().not_null())
                    .col(ColumnDef::new(CardioSessions::Description).text().null())
                    .col(
                        ColumnDef::new(CardioSessions::TargetDuration)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CardioSessions::IntensityZone).integer().null())
                    .col(ColumnDef::new(CardioSessions::Equipment).string().null())
                    .col(ColumnDef::new(CardioSessions::TargetHrRange).json().null())
                    .col(ColumnDef::new(CardioSessions::TargetPowerRange).json().null())
                    .col(ColumnDef::new(CardioSessions::IntervalStructure).json().null())
                    .col(ColumnDef::new(CardioSessions::Notes).text().null())
                    .col(
                        ColumnDef::new(CardioSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cardio_sessions_week")
                            .from(CardioSessions::Table, CardioSessions::WeekId)
                            .to(CardioWeeks::Table, CardioWeeks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cardio_weeks_cardio_program_id")
                    .table(CardioWeeks::Table)
                    .col(CardioWeeks::CardioProgramId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cardio_sessions_week_id")
                    .table(CardioSessions::Table)
                    .col(CardioSessions::WeekId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CardioSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CardioWeeks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CardioPrograms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CardioPrograms {
    Table,
    Id,
    UserId,
    Name,
    CopyStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CardioWeeks {
    Table,
    Id,
    CardioProgramId,
    UserId,
    WeekNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CardioSessions {
    Table,
    Id,
    WeekId,
    UserId,
    DayNumber,
    Name,
    Description,
    TargetDuration,
    IntensityZone,
    Equipment,
    TargetHrRange,
    TargetPowerRange,
    IntervalStructure,
    Notes,
    CreatedAt,
}
