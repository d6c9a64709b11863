use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookmarks::Table)
                    .if_not_exists()
                    .col(uuid(Bookmarks::OwnerId))
                    .col(uuid(Bookmarks::BookId))
                    .col(integer(Bookmarks::Page))
                    .col(integer(Bookmarks::TotalPages))
                    .col(timestamp_with_time_zone(Bookmarks::UpdatedAt))
                    .primary_key(
                        Index::create()
                            .col(Bookmarks::OwnerId)
                            .col(Bookmarks::BookId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookmarks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Bookmarks {
    Table,
    OwnerId,
    BookId,
    Page,
    TotalPages,
    UpdatedAt,
}
