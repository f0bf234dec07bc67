pub use sea_orm_migration::prelude::*;

mod m20241007_000001_create_tables;
mod m20241009_000001_add_vote_unique_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241007_000001_create_tables::Migration),
            Box::new(m20241009_000001_add_vote_unique_index::Migration),
        ]
    }
}
