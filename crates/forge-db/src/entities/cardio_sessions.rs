use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cardio_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub week_id: Uuid,
    pub user_id: String,
    pub day_number: i32,
    pub name: String,
    pub description: Option<String>,
    pub target_duration: i32,
    pub intensity_zone: Option<i32>,
    pub equipment: Option<String>,
    pub target_hr_range: Option<Json>,
    pub target_power_range: Option<Json>,
    pub interval_structure: Option<Json>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cardio_weeks::Entity",
        from = "Column::WeekId",
        to = "super::cardio_weeks::Column::Id",
        on_delete = "Cascade"
    )]
    CardioWeeks,
}

impl Related<super::cardio_weeks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardioWeeks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
