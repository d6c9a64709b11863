//! Reading-position rows on the remote store.

use uuid::Uuid;

use super::{RemoteClient, RemoteError};
use crate::domain::models::ProgressRecord;
use crate::storage::ProgressStore;

const PROGRESS_TABLE: &str = "reading_progress";

#[async_trait::async_trait]
impl ProgressStore for RemoteClient {
    /// GET /rest/v1/reading_progress?owner_id=eq.{owner}&book_id=eq.{book}
    ///
    /// A filtered read returns an empty array when no record exists, so
    /// "no progress yet" comes back as `Ok(None)` rather than an error.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn fetch_progress(
        &self,
        owner_id: Uuid,
        book_id: Uuid,
    ) -> Result<Option<ProgressRecord>, RemoteError> {
        let url = self.rest_url(PROGRESS_TABLE);
        tracing::debug!(%url, %owner_id, %book_id, "GET progress");
        let req = self.authed(self.client.get(&url)).query(&[
            ("select", "*".to_string()),
            ("owner_id", format!("eq.{}", owner_id)),
            ("book_id", format!("eq.{}", book_id)),
        ]);
        let resp = Self::check(req.send().await?).await?;
        let body = resp.text().await?;
        let rows: Vec<ProgressRecord> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().next())
    }

    /// POST /rest/v1/reading_progress?on_conflict=owner_id,book_id with
    /// merge-duplicates resolution: one atomic upsert keyed on the
    /// composite identifier, no check-then-act window.
    #[tracing::instrument(level = "debug", skip(self, record))]
    async fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), RemoteError> {
        let url = self.rest_url(PROGRESS_TABLE);
        tracing::debug!(%url, owner_id = %record.owner_id, book_id = %record.book_id, page = record.page, "UPSERT progress");
        let req = self
            .authed(self.client.post(&url))
            .query(&[("on_conflict", "owner_id,book_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record);
        Self::check(req.send().await?).await?;
        Ok(())
    }

    /// DELETE /rest/v1/reading_progress?owner_id=eq.{owner}&book_id=eq.{book}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_progress(&self, owner_id: Uuid, book_id: Uuid) -> Result<(), RemoteError> {
        let url = self.rest_url(PROGRESS_TABLE);
        tracing::debug!(%url, %owner_id, %book_id, "DELETE progress");
        let req = self.authed(self.client.delete(&url)).query(&[
            ("owner_id", format!("eq.{}", owner_id)),
            ("book_id", format!("eq.{}", book_id)),
        ]);
        Self::check(req.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::models::ProgressRecord;

    #[test]
    fn progress_rows_deserialize_example() {
        let json = r#"[
            {
                "owner_id": "55b8b4f3-2ec7-460b-8178-e02b8b619c03",
                "book_id": "075ebcee-d657-4b01-a96d-b94fadb1898c",
                "page": 42,
                "total_pages": 310,
                "last_read_at": "2026-08-20T21:14:03+00:00"
            }
        ]"#;

        let rows: Vec<ProgressRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].page, 42);
        assert_eq!(rows[0].total_pages, 310);
    }

    #[test]
    fn empty_result_set_is_no_record() {
        let rows: Vec<ProgressRecord> = serde_json::from_str("[]").unwrap();
        assert!(rows.into_iter().next().is_none());
    }
}
