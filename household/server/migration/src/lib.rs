pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_projects_table;
mod m20250901_000002_create_tasks_table;
mod m20250901_000003_create_notes_table;
mod m20250901_000004_create_wishlists_table;
mod m20250901_000005_create_shopping_items_table;
mod m20250914_120000_add_task_status_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_projects_table::Migration),
            Box::new(m20250901_000002_create_tasks_table::Migration),
            Box::new(m20250901_000003_create_notes_table::Migration),
            Box::new(m20250901_000004_create_wishlists_table::Migration),
            Box::new(m20250901_000005_create_shopping_items_table::Migration),
            Box::new(m20250914_120000_add_task_status_index::Migration),
        ]
    }
}
