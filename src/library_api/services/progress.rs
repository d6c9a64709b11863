//! Reading-position tracking: remote-first with a local bookmark fallback.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::ProgressRecord;
use crate::remote_client::RemoteError;
use crate::storage::{BookCache, ProgressStore};

/// What the reader sees: current position plus when it was last saved
/// remotely (absent when only the local bookmark answered).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressView {
    pub page: i32,
    pub total_pages: i32,
    pub last_read_at: Option<DateTime<Utc>>,
}

pub struct ProgressService<'a> {
    remote: &'a dyn ProgressStore,
    cache: &'a dyn BookCache,
}

impl<'a> ProgressService<'a> {
    pub fn new(remote: &'a dyn ProgressStore, cache: &'a dyn BookCache) -> Self {
        Self { remote, cache }
    }

    /// Remote lookup by (owner, book); a missing record is a valid empty
    /// state and falls back to the local bookmark, then to page 0 of 0.
    /// Remote errors degrade the same way.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_progress(&self, owner_id: Uuid, book_id: Uuid) -> ProgressView {
        match self.remote.fetch_progress(owner_id, book_id).await {
            Ok(Some(record)) => {
                return ProgressView {
                    page: record.page,
                    total_pages: record.total_pages,
                    last_read_at: Some(record.last_read_at),
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%owner_id, %book_id, error = %e, "remote progress lookup failed, using local bookmark");
            }
        }

        match self.cache.bookmark(owner_id, book_id).await {
            Ok(Some(bookmark)) => ProgressView {
                page: bookmark.page,
                total_pages: bookmark.total_pages,
                last_read_at: None,
            },
            Ok(None) => ProgressView::default(),
            Err(e) => {
                tracing::warn!(%owner_id, %book_id, error = %format!("{:?}", e), "bookmark lookup failed");
                ProgressView::default()
            }
        }
    }

    /// One atomic remote upsert keyed on (owner, book), then a best-effort
    /// bookmark write so the local fallback stays warm.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn save_progress(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
        page: i32,
        total_pages: i32,
    ) -> Result<ProgressRecord, RemoteError> {
        let record = ProgressRecord {
            owner_id,
            book_id,
            page,
            total_pages,
            last_read_at: Utc::now(),
        };
        self.remote.upsert_progress(&record).await?;

        if let Err(e) = self
            .cache
            .set_bookmark(owner_id, book_id, page, total_pages)
            .await
        {
            tracing::warn!(%owner_id, %book_id, error = %format!("{:?}", e), "failed to update local bookmark");
        }
        Ok(record)
    }
}
