use poem_openapi::payload::PlainText;

use crate::remote_client::RemoteClient;

pub struct HealthService<'a> {
    pub remote: &'a RemoteClient,
}

impl<'a> HealthService<'a> {
    pub fn new(remote: &'a RemoteClient) -> Self {
        Self { remote }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        match self.remote.health().await {
            Ok(()) => PlainText(format!(
                "shelf-sync {} remote=ok",
                env!("CARGO_PKG_VERSION")
            )),
            Err(e) => PlainText(format!(
                "shelf-sync {} remote=error: {}",
                env!("CARGO_PKG_VERSION"),
                e
            )),
        }
    }
}
