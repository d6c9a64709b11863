// Capability seams over the remote store and the local replica. Services
// depend on these traits so they can be exercised against in-memory fakes.

#[cfg(test)]
pub mod testing;

use uuid::Uuid;

use crate::domain::models::{Book, Bookmark, ProgressRecord};
use crate::remote_client::RemoteError;

/// Row-oriented CRUD over the remote book metadata table, filtered by
/// equality on owner id, book id and name.
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    async fn books_for_owner(&self, owner_id: Uuid) -> Result<Vec<Book>, RemoteError>;
    async fn insert_book(&self, book: &Book) -> Result<(), RemoteError>;
    async fn find_books_by_name(&self, owner_id: Uuid, name: &str)
    -> Result<Vec<Book>, RemoteError>;
    async fn delete_books_by_name(&self, owner_id: Uuid, name: &str) -> Result<(), RemoteError>;
}

/// Remote reading-position records keyed by (owner, book).
#[async_trait::async_trait]
pub trait ProgressStore: Send + Sync {
    /// `Ok(None)` when no record exists yet; that is a valid empty state.
    async fn fetch_progress(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RemoteError>;
    /// Single atomic upsert keyed on the composite (owner, book) identifier.
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), RemoteError>;
    async fn delete_progress(&self, owner_id: Uuid, book_id: Uuid) -> Result<(), RemoteError>;
}

/// Remote blob bucket: put-by-path with overwrite, public-URL-by-path,
/// delete-by-path.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RemoteError>;
    fn public_url(&self, path: &str) -> String;
    async fn delete_object(&self, path: &str) -> Result<(), RemoteError>;
}

/// On-device replica of book rows plus the local bookmark fallback.
#[async_trait::async_trait]
pub trait BookCache: Send + Sync {
    async fn all_books(&self, owner_id: Uuid) -> anyhow::Result<Vec<Book>>;
    async fn get_book(&self, book_id: Uuid) -> anyhow::Result<Option<Book>>;
    /// Upsert by book id.
    async fn put_book(&self, book: &Book) -> anyhow::Result<()>;
    async fn delete_book(&self, book_id: Uuid) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
    async fn bookmark(&self, owner_id: Uuid, book_id: Uuid) -> anyhow::Result<Option<Bookmark>>;
    async fn set_bookmark(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
        page: i32,
        total_pages: i32,
    ) -> anyhow::Result<()>;
}
