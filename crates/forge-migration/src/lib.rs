use sea_orm_migration::prelude::*;

mod m0001_create_community_programs;
mod m0002_create_programs;
mod m0003_create_cardio_programs;
mod m0004_add_clone_lease;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0001_create_community_programs::Migration),
            Box::new(m0002_create_programs::Migration),
            Box::new(m0003_create_cardio_programs::Migration),
            Box::new(m0004_add_clone_lease::Migration),
        ]
    }
}
