//! Server: loads the entity catalog, picks a record store, mounts `/api`.
//!
//! With `DATABASE_URL` set, records live in PostgreSQL (tables are created on startup);
//! otherwise they live in process memory.

use fitness_records::{
    app_router, apply_migrations, builtin_config, ensure_database_exists, load_from_path, resolve, AppState,
    InMemoryStore, PgStore, RecordStore, Settings,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fitness_records=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let config = match &settings.entities_path {
        Some(path) => load_from_path(path).await?,
        None => builtin_config()?,
    };
    let registry = resolve(&config)?;
    tracing::info!(entities = registry.len(), "entity catalog loaded");

    let store: Arc<dyn RecordStore> = match &settings.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;
            let store = PgStore::new(pool, settings.records_schema.clone());
            apply_migrations(store.pool(), store.schema(), &registry).await?;
            tracing::info!(schema = %store.schema(), "using postgres record store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory record store");
            Arc::new(InMemoryStore::new())
        }
    };

    let state = AppState::new(registry, store);
    let app = app_router(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
