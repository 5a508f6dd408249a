use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommunityPrograms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommunityPrograms::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommunityPrograms::Name).string().not_null())
                    .col(ColumnDef::new(CommunityPrograms::ProgramType).string().not_null())
                    .col(ColumnDef::new(CommunityPrograms::ProgramData).json().not_null())
                    .col(
                        ColumnDef::new(CommunityPrograms::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommunityPrograms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CommunityPrograms {
    Table,
    Id,
    Name,
    ProgramType,
    ProgramData,
    PublishedAt,
}
