pub use sea_orm_migration::prelude::*;

mod m20260823_000001_create_cached_books_table;
mod m20260823_000002_create_bookmarks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260823_000001_create_cached_books_table::Migration),
            Box::new(m20260823_000002_create_bookmarks_table::Migration),
        ]
    }
}
