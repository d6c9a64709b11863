//! Client for the hosted backend: row-oriented metadata tables, a blob
//! bucket and the identity endpoint, all under one base URL.

mod blobs;
mod books;
mod error;
mod progress;

pub use error::RemoteError;

use serde::Deserialize;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct RemoteClient {
    base_url: String,
    api_key: Option<String>,
    bucket: String,
    client: reqwest::Client,
}

const DEFAULT_BUCKET: &str = "books";

impl RemoteClient {
    /// Create a new client with the given base URL (e.g. "https://abc.example.co").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating RemoteClient");
        Ok(RemoteClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            api_key: None,
            bucket: DEFAULT_BUCKET.to_string(),
            client,
        })
    }

    /// Return a client with the provided service API key set.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Return a client writing blobs to the given bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn rest_url(&self, table: &str) -> String {
        self.url(&format!("/rest/v1/{}", table))
    }

    fn object_url(&self, path: &str) -> String {
        self.url(&format!("/storage/v1/object/{}/{}", self.bucket, path))
    }

    /// Attach the service key headers to a request.
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key.as_ref() {
            Some(key) => req.header("apikey", key).bearer_auth(key),
            None => req,
        }
    }

    /// Map non-success statuses onto the error taxonomy, logging a body
    /// snippet for anything unexpected.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(2000).collect();
        match status.as_u16() {
            401 | 403 => Err(RemoteError::NotAuthenticated),
            404 => Err(RemoteError::NotFound),
            code => {
                tracing::error!(status = code, body_snippet = %snippet, "remote store error");
                Err(RemoteError::Status {
                    status: code,
                    message: snippet,
                })
            }
        }
    }

    // ===== Identity =====

    /// Resolve an end-user access token to the signed-in user.
    #[tracing::instrument(level = "debug", skip(self, access_token))]
    pub async fn current_user(&self, access_token: &str) -> Result<UserInfo, RemoteError> {
        if access_token.trim().is_empty() {
            return Err(RemoteError::NotAuthenticated);
        }
        let url = self.url("/auth/v1/user");
        tracing::debug!(%url, "GET current user");
        let mut req = self.client.get(&url).bearer_auth(access_token);
        if let Some(key) = self.api_key.as_ref() {
            req = req.header("apikey", key);
        }
        let resp = Self::check(req.send().await?).await?;
        let body = resp.text().await?;
        let user: AuthUser = serde_json::from_str(&body)?;
        Ok(UserInfo {
            id: user.id,
            display_name: user.user_metadata.full_name,
        })
    }

    /// Build the identity provider's login redirect URL. Pure; performs no
    /// request.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> String {
        format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url, provider, redirect_to
        )
    }

    /// GET /auth/v1/health (reachability probe).
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn health(&self) -> Result<(), RemoteError> {
        let url = self.url("/auth/v1/health");
        let req = self.authed(self.client.get(&url));
        Self::check(req.send().await?).await?;
        Ok(())
    }
}

/// Wire shape of the identity endpoint's user object.
#[derive(Debug, Deserialize, PartialEq)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
struct UserMetadata {
    full_name: Option<String>,
}

/// The signed-in owner as the rest of the service sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: Uuid,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_authorize_url_basic() {
        let c = RemoteClient::new("https://abc.example.co/").unwrap();
        let url = c.authorize_url("github", "https://app.example/dashboard");
        assert_eq!(
            url,
            "https://abc.example.co/auth/v1/authorize?provider=github&redirect_to=https://app.example/dashboard"
        );
    }

    #[test]
    fn rest_and_object_urls() {
        let c = RemoteClient::new("https://abc.example.co").unwrap().with_bucket("books");
        assert_eq!(c.rest_url("books"), "https://abc.example.co/rest/v1/books");
        assert_eq!(
            c.object_url("u1/file.pdf"),
            "https://abc.example.co/storage/v1/object/books/u1/file.pdf"
        );
    }

    #[test]
    fn auth_user_deserialize() {
        let json = r#"{
            "id": "b8df8f4c-5f93-4a10-812b-84ec4cee4389",
            "aud": "authenticated",
            "email": "reader@example.com",
            "user_metadata": { "full_name": "Avid Reader", "avatar_url": "https://x" }
        }"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_metadata.full_name.as_deref(), Some("Avid Reader"));
    }

    #[test]
    fn auth_user_deserialize_without_metadata() {
        let json = r#"{ "id": "b8df8f4c-5f93-4a10-812b-84ec4cee4389" }"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_metadata.full_name, None);
    }
}
