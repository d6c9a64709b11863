//! Sqlite-backed local replica: cached book rows plus bookmark fallbacks.
//! Disposable by design; `clear` drops everything and the reconciler
//! rebuilds it from the remote store.

use anyhow::Context;
use entities::{bookmarks, cached_books};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::models::{Book, Bookmark, Category};
use crate::storage::BookCache;

#[derive(Clone)]
pub struct LocalCache {
    db: DatabaseConnection,
}

impl LocalCache {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_domain(model: cached_books::Model) -> Book {
        let category = model.category.as_deref().and_then(|s| {
            let parsed = s.parse::<Category>();
            if parsed.is_err() {
                tracing::debug!(category = %s, book_id = %model.id, "dropping unknown cached category");
            }
            parsed.ok()
        });
        Book {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            category,
            file_url: model.file_url,
            storage_path: model.storage_path,
        }
    }

    fn to_active(book: &Book) -> cached_books::ActiveModel {
        cached_books::ActiveModel {
            id: Set(book.id),
            owner_id: Set(book.owner_id),
            name: Set(book.name.clone()),
            category: Set(book.category.map(|c| c.as_str().to_string())),
            file_url: Set(book.file_url.clone()),
            storage_path: Set(book.storage_path.clone()),
        }
    }
}

#[async_trait::async_trait]
impl BookCache for LocalCache {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn all_books(&self, owner_id: Uuid) -> anyhow::Result<Vec<Book>> {
        let rows = cached_books::Entity::find()
            .filter(cached_books::Column::OwnerId.eq(owner_id))
            .all(&self.db)
            .await
            .context("failed to read cached books")?;
        Ok(rows.into_iter().map(Self::to_domain).collect())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn get_book(&self, book_id: Uuid) -> anyhow::Result<Option<Book>> {
        let row = cached_books::Entity::find_by_id(book_id)
            .one(&self.db)
            .await
            .context("failed to read cached book")?;
        Ok(row.map(Self::to_domain))
    }

    #[tracing::instrument(level = "debug", skip(self, book))]
    async fn put_book(&self, book: &Book) -> anyhow::Result<()> {
        cached_books::Entity::insert(Self::to_active(book))
            .on_conflict(
                OnConflict::column(cached_books::Column::Id)
                    .update_columns([
                        cached_books::Column::OwnerId,
                        cached_books::Column::Name,
                        cached_books::Column::Category,
                        cached_books::Column::FileUrl,
                        cached_books::Column::StoragePath,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .with_context(|| format!("failed to cache book {}", book.id))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_book(&self, book_id: Uuid) -> anyhow::Result<()> {
        cached_books::Entity::delete_by_id(book_id)
            .exec(&self.db)
            .await
            .context("failed to delete cached book")?;
        bookmarks::Entity::delete_many()
            .filter(bookmarks::Column::BookId.eq(book_id))
            .exec(&self.db)
            .await
            .context("failed to delete bookmarks for book")?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn clear(&self) -> anyhow::Result<()> {
        cached_books::Entity::delete_many()
            .exec(&self.db)
            .await
            .context("failed to clear cached books")?;
        bookmarks::Entity::delete_many()
            .exec(&self.db)
            .await
            .context("failed to clear bookmarks")?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn bookmark(&self, owner_id: Uuid, book_id: Uuid) -> anyhow::Result<Option<Bookmark>> {
        let row = bookmarks::Entity::find_by_id((owner_id, book_id))
            .one(&self.db)
            .await
            .context("failed to read bookmark")?;
        Ok(row.map(|m| Bookmark {
            page: m.page,
            total_pages: m.total_pages,
        }))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn set_bookmark(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
        page: i32,
        total_pages: i32,
    ) -> anyhow::Result<()> {
        let model = bookmarks::ActiveModel {
            owner_id: Set(owner_id),
            book_id: Set(book_id),
            page: Set(page),
            total_pages: Set(total_pages),
            updated_at: Set(chrono::Utc::now()),
        };
        bookmarks::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([bookmarks::Column::OwnerId, bookmarks::Column::BookId])
                    .update_columns([
                        bookmarks::Column::Page,
                        bookmarks::Column::TotalPages,
                        bookmarks::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("failed to store bookmark")?;
        Ok(())
    }
}
