//! Book lifecycle: upload, delete, reader lookup.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{Book, Category};
use crate::domain::slug::storage_path;
use crate::remote_client::RemoteError;
use crate::storage::{BlobStore, BookCache, BookStore, ProgressStore};

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub struct BookService<'a> {
    remote: &'a dyn BookStore,
    progress: &'a dyn ProgressStore,
    blobs: &'a dyn BlobStore,
    cache: &'a dyn BookCache,
}

impl<'a> BookService<'a> {
    pub fn new(
        remote: &'a dyn BookStore,
        progress: &'a dyn ProgressStore,
        blobs: &'a dyn BlobStore,
        cache: &'a dyn BookCache,
    ) -> Self {
        Self {
            remote,
            progress,
            blobs,
            cache,
        }
    }

    /// Store the payload in the bucket, then record the metadata row, then
    /// mirror it into the local replica. A blob failure aborts before any
    /// row is written; a row failure after the blob succeeded leaves the
    /// blob orphaned (logged, no rollback).
    #[tracing::instrument(level = "debug", skip(self, data))]
    pub async fn upload(
        &self,
        owner_id: Uuid,
        name: &str,
        category: Option<Category>,
        data: &str,
    ) -> Result<Book, UploadError> {
        let bytes = decode_payload(data)?;
        if bytes.is_empty() {
            return Err(UploadError::InvalidPayload("empty document".to_string()));
        }

        let id = Uuid::new_v4();
        let path = storage_path(owner_id, id, name);

        self.blobs
            .put_object(&path, bytes, PDF_CONTENT_TYPE)
            .await?;
        let file_url = self.blobs.public_url(&path);

        let book = Book {
            id,
            owner_id,
            name: name.to_string(),
            category,
            file_url,
            storage_path: path,
        };
        if let Err(e) = self.remote.insert_book(&book).await {
            tracing::error!(book_id = %book.id, storage_path = %book.storage_path, error = %e,
                "metadata insert failed after blob upload, blob is orphaned");
            return Err(e.into());
        }

        if let Err(e) = self.cache.put_book(&book).await {
            tracing::warn!(book_id = %book.id, error = %format!("{:?}", e), "failed to mirror uploaded book locally");
        }

        tracing::info!(book_id = %book.id, name = %book.name, "book uploaded");
        Ok(book)
    }

    /// Best-effort cascade keyed by owner + display name, matching how the
    /// dashboard addresses books. Blob, progress record, metadata rows and
    /// local replica are each attempted independently; one failing step is
    /// logged and the rest still run.
    #[tracing::instrument(level = "debug", skip(self, name))]
    pub async fn delete(&self, owner_id: Uuid, name: &str) -> Result<(), RemoteError> {
        let books = self.remote.find_books_by_name(owner_id, name).await?;
        let Some(book) = books.into_iter().next() else {
            return Err(RemoteError::NotFound);
        };

        if let Err(e) = self.blobs.delete_object(&book.storage_path).await {
            tracing::warn!(book_id = %book.id, storage_path = %book.storage_path, error = %e, "blob delete failed");
        }
        if let Err(e) = self.progress.delete_progress(owner_id, book.id).await {
            tracing::warn!(book_id = %book.id, error = %e, "progress delete failed");
        }
        if let Err(e) = self.remote.delete_books_by_name(owner_id, name).await {
            tracing::warn!(book_id = %book.id, error = %e, "metadata row delete failed");
        }
        if let Err(e) = self.cache.delete_book(book.id).await {
            tracing::warn!(book_id = %book.id, error = %format!("{:?}", e), "local replica delete failed");
        }

        tracing::info!(book_id = %book.id, name = %book.name, "book deleted");
        Ok(())
    }

    /// Reader lookup: replica first, remote fallback (which also back-fills
    /// the replica for next time).
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get(&self, owner_id: Uuid, book_id: Uuid) -> Result<Option<Book>, RemoteError> {
        match self.cache.get_book(book_id).await {
            Ok(Some(book)) if book.owner_id == owner_id => return Ok(Some(book)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(%book_id, error = %format!("{:?}", e), "local replica read failed");
            }
        }

        let remote = self.remote.books_for_owner(owner_id).await?;
        let found = remote.into_iter().find(|b| b.id == book_id);
        if let Some(book) = &found {
            if let Err(e) = self.cache.put_book(book).await {
                tracing::warn!(%book_id, error = %format!("{:?}", e), "failed to back-fill local replica");
            }
        }
        Ok(found)
    }
}

/// Accept either a browser-style data URL ("data:application/pdf;base64,…")
/// or bare base64.
fn decode_payload(data: &str) -> Result<Vec<u8>, UploadError> {
    let b64 = match data.split_once(',') {
        Some((_, rest)) => rest,
        None => data,
    };
    STANDARD
        .decode(b64.trim())
        .map_err(|e| UploadError::InvalidPayload(e.to_string()))
}
