//! Book metadata rows on the remote store.

use uuid::Uuid;

use super::{RemoteClient, RemoteError};
use crate::domain::models::Book;
use crate::storage::BookStore;

const BOOKS_TABLE: &str = "books";

#[async_trait::async_trait]
impl BookStore for RemoteClient {
    /// GET /rest/v1/books?owner_id=eq.{owner}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn books_for_owner(&self, owner_id: Uuid) -> Result<Vec<Book>, RemoteError> {
        let url = self.rest_url(BOOKS_TABLE);
        tracing::debug!(%url, %owner_id, "GET books");
        let req = self.authed(self.client.get(&url)).query(&[
            ("select", "*".to_string()),
            ("owner_id", format!("eq.{}", owner_id)),
        ]);
        let resp = Self::check(req.send().await?).await?;
        let body = resp.text().await?;
        match serde_json::from_str::<Vec<Book>>(&body) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                let snippet: String = body.chars().take(2000).collect();
                tracing::error!(error = %e, body_snippet = %snippet, "failed to parse book rows");
                Err(e.into())
            }
        }
    }

    /// POST /rest/v1/books
    #[tracing::instrument(level = "debug", skip(self, book))]
    async fn insert_book(&self, book: &Book) -> Result<(), RemoteError> {
        let url = self.rest_url(BOOKS_TABLE);
        tracing::debug!(%url, book_id = %book.id, "POST book row");
        let req = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(book);
        Self::check(req.send().await?).await?;
        Ok(())
    }

    /// GET /rest/v1/books?owner_id=eq.{owner}&name=eq.{name}
    #[tracing::instrument(level = "debug", skip(self, name))]
    async fn find_books_by_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Vec<Book>, RemoteError> {
        let url = self.rest_url(BOOKS_TABLE);
        tracing::debug!(%url, %owner_id, %name, "GET books by name");
        let req = self.authed(self.client.get(&url)).query(&[
            ("select", "*".to_string()),
            ("owner_id", format!("eq.{}", owner_id)),
            ("name", format!("eq.{}", name)),
        ]);
        let resp = Self::check(req.send().await?).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// DELETE /rest/v1/books?owner_id=eq.{owner}&name=eq.{name}
    #[tracing::instrument(level = "debug", skip(self, name))]
    async fn delete_books_by_name(&self, owner_id: Uuid, name: &str) -> Result<(), RemoteError> {
        let url = self.rest_url(BOOKS_TABLE);
        tracing::debug!(%url, %owner_id, %name, "DELETE book rows");
        let req = self.authed(self.client.delete(&url)).query(&[
            ("owner_id", format!("eq.{}", owner_id)),
            ("name", format!("eq.{}", name)),
        ]);
        Self::check(req.send().await?).await?;
        Ok(())
    }
}
