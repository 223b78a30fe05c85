use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShoppingItems::Table)
                    .if_not_exists()
                    .col(pk_auto(ShoppingItems::Id))
                    .col(string(ShoppingItems::Title))
                    .col(
                        timestamp_with_time_zone(ShoppingItems::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ShoppingItems::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShoppingItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShoppingItems {
    Table,
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
}
