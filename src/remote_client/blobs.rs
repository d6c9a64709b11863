//! PDF payloads in the remote blob bucket.

use super::{RemoteClient, RemoteError};
use crate::storage::BlobStore;

#[async_trait::async_trait]
impl BlobStore for RemoteClient {
    /// POST /storage/v1/object/{bucket}/{path} with overwrite allowed.
    #[tracing::instrument(level = "debug", skip(self, bytes, content_type))]
    async fn put_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RemoteError> {
        let url = self.object_url(path);
        tracing::debug!(%url, size = bytes.len(), "PUT blob");
        let req = self
            .authed(self.client.post(&url))
            .header("x-upsert", "true")
            .header("Content-Type", content_type.to_string())
            .body(bytes);
        Self::check(req.send().await?).await?;
        Ok(())
    }

    /// Public retrieval URL for a stored blob. Pure; performs no request.
    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    /// DELETE /storage/v1/object/{bucket}/{path}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete_object(&self, path: &str) -> Result<(), RemoteError> {
        let url = self.object_url(path);
        tracing::debug!(%url, "DELETE blob");
        let req = self.authed(self.client.delete(&url));
        Self::check(req.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_public_url_basic() {
        let c = RemoteClient::new("https://abc.example.co")
            .unwrap()
            .with_bucket("books");
        assert_eq!(
            c.public_url("55b8b4f3/linear-algebra-075ebcee.pdf"),
            "https://abc.example.co/storage/v1/object/public/books/55b8b4f3/linear-algebra-075ebcee.pdf"
        );
    }
}
