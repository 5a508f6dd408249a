use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cardio_weeks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cardio_program_id: Uuid,
    pub user_id: String,
    pub week_number: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cardio_programs::Entity",
        from = "Column::CardioProgramId",
        to = "super::cardio_programs::Column::Id",
        on_delete = "Cascade"
    )]
    CardioPrograms,
    #[sea_orm(has_many = "super::cardio_sessions::Entity")]
    CardioSessions,
}

impl Related<super::cardio_programs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardioPrograms.def()
    }
}

impl Related<super::cardio_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardioSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
