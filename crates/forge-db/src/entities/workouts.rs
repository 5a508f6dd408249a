use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub week_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub day_number: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::program_weeks::Entity",
        from = "Column::WeekId",
        to = "super::program_weeks::Column::Id",
        on_delete = "Cascade"
    )]
    ProgramWeeks,
    #[sea_orm(has_many = "super::exercises::Entity")]
    Exercises,
}

impl Related<super::program_weeks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgramWeeks.def()
    }
}

impl Related<super::exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
