use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedBooks::Table)
                    .if_not_exists()
                    .col(uuid(CachedBooks::Id).primary_key())
                    .col(uuid(CachedBooks::OwnerId))
                    .col(string(CachedBooks::Name))
                    .col(string_null(CachedBooks::Category))
                    .col(string(CachedBooks::FileUrl))
                    .col(string(CachedBooks::StoragePath))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cached_books_owner_id")
                    .table(CachedBooks::Table)
                    .col(CachedBooks::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedBooks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum CachedBooks {
    Table,
    Id,
    OwnerId,
    Name,
    Category,
    FileUrl,
    StoragePath,
}
