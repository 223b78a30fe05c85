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
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(pk_auto(Wishlists::Id))
                    .col(string(Wishlists::Title))
                    .col(text(Wishlists::Content).default(""))
                    .col(string(Wishlists::Color).default("yellow"))
                    .col(
                        timestamp_with_time_zone(Wishlists::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Wishlists::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Wishlists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Wishlists {
    Table,
    Id,
    Title,
    Content,
    Color,
    CreatedAt,
    UpdatedAt,
}
