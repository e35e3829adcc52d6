use anyhow::Result;
use biztime::cli::Cli;
use biztime::config::{AppConfig, StorageBackend};
use biztime::server::ServerBuilder;
use biztime::storage::InMemoryStore;
use biztime::telemetry::init_tracing;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_tracing(&config.logging)?;

    let addr = config.bind_address();
    let builder = with_configured_store(ServerBuilder::new().with_config(&config), &config).await?;

    builder.serve(&addr).await
}

async fn with_configured_store(builder: ServerBuilder, config: &AppConfig) -> Result<ServerBuilder> {
    match config.storage.backend {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory storage");
            Ok(builder.with_store(InMemoryStore::new()))
        }
        StorageBackend::Postgres => postgres_store(builder, config).await,
    }
}

#[cfg(feature = "postgres")]
async fn postgres_store(builder: ServerBuilder, config: &AppConfig) -> Result<ServerBuilder> {
    use biztime::storage::PostgresStore;

    let url = config
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;

    let store = PostgresStore::connect(
        url,
        config.storage.max_connections,
        config.storage.acquire_timeout(),
    )
    .await?;
    store.ensure_schema().await?;

    Ok(builder.with_store(store))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_store(_builder: ServerBuilder, _config: &AppConfig) -> Result<ServerBuilder> {
    anyhow::bail!("biztime was built without the `postgres` feature")
}
