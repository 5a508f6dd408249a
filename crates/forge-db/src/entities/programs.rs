use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "programs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub copy_status: String,
    pub clone_lease_id: Option<Uuid>,
    pub clone_lease_expires_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::program_weeks::Entity")]
    ProgramWeeks,
}

impl Related<super::program_weeks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgramWeeks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
