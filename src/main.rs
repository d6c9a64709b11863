mod cache;
mod config;
mod domain;
mod library_api;
mod remote_client;
mod storage;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use cache::LocalCache;
use config::Config;
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use remote_client::RemoteClient;
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ShelfSyncResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ShelfSyncResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting Ebook Shelf Sync"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    match config.validate() {
        Ok(_) => {}
        Err(e) => {
            return Err(anyhow::anyhow!(e));
        }
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to local cache database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let remote = RemoteClient::new(&config.remote_base_url)?
        .with_api_key(&config.remote_api_key)
        .with_bucket(&config.blob_bucket);
    tracing::info!(remote_base = %config.remote_base_url, bucket = %config.blob_bucket, "configured remote client");

    run_poem(
        Arc::new(remote),
        Arc::new(LocalCache::new(db_conn)),
        Arc::new(config),
    )
    .await?;
    Ok(())
}

pub async fn run_poem(
    remote: Arc<RemoteClient>,
    cache: Arc<LocalCache>,
    config: Arc<Config>,
) -> ShelfSyncResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let bind_addr = config.bind_addr.clone();
    let api = library_api::ShelfApi {
        remote,
        cache,
        config,
    };
    let api_service = OpenApiService::new(api, "Ebook Shelf Sync API", version)
        .server(format!("http://{}", bind_addr));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
