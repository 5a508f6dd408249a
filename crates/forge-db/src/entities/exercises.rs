use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workout_id: Uuid,
    pub user_id: String,
    pub exercise_definition_id: String,
    pub name: String,
    // `order` in the snapshot
    pub position: i32,
    pub exercise_group: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workouts::Entity",
        from = "Column::WorkoutId",
        to = "super::workouts::Column::Id",
        on_delete = "Cascade"
    )]
    Workouts,
    #[sea_orm(has_many = "super::prescribed_sets::Entity")]
    PrescribedSets,
}

impl Related<super::workouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workouts.def()
    }
}

impl Related<super::prescribed_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrescribedSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
