use sea_orm_migration::prelude::*;

use crate::m20250901_000002_create_tasks_table::Tasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_TASKS_STATUS: &str = "idx-tasks-status";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_TASKS_STATUS)
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_TASKS_STATUS)
                    .table(Tasks::Table)
                    .to_owned(),
            )
            .await
    }
}
