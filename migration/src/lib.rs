pub use sea_orm_migration::prelude::*;

mod m20241001_000001_create_tables;
mod m20241024_081840_add_photo_url_to_cast_member;
mod m20241101_000001_add_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000001_create_tables::Migration),
            Box::new(m20241024_081840_add_photo_url_to_cast_member::Migration),
            Box::new(m20241101_000001_add_unique_indexes::Migration),
        ]
    }
}
