#[derive(Debug)]
pub struct Config {
    pub remote_base_url: String,
    pub remote_api_key: String,
    pub blob_bucket: String,
    pub db_connection_string: String,
    pub login_redirect_url: String,
    pub bind_addr: String,
}

const DEFAULT_BLOB_BUCKET: &str = "books";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://cache.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Config {
    pub fn load() -> Self {
        let remote_base_url = std::env::var("REMOTE_BASE_URL").unwrap_or_default();
        let remote_api_key = std::env::var("REMOTE_API_KEY").unwrap_or_default();
        let blob_bucket = std::env::var("BLOB_BUCKET").unwrap_or(DEFAULT_BLOB_BUCKET.into());
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let login_redirect_url = std::env::var("LOGIN_REDIRECT_URL").unwrap_or_default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        Config {
            remote_base_url,
            remote_api_key,
            blob_bucket,
            db_connection_string,
            login_redirect_url,
            bind_addr,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.remote_base_url.is_empty() {
            return Err("REMOTE_BASE_URL is missing".into());
        }
        if self.remote_api_key.is_empty() {
            return Err("REMOTE_API_KEY is missing".into());
        }
        Ok(())
    }
}
