//! Create the collection tables for a registry: schema, one table per entity, unique indexes.
//! Idempotent (IF NOT EXISTS throughout); never alters or drops existing tables.

use crate::config::EntityRegistry;
use crate::error::AppError;
use crate::sql;
use sqlx::PgPool;

pub async fn apply_migrations(pool: &PgPool, schema: &str, registry: &EntityRegistry) -> Result<(), AppError> {
    let ddl = sql::create_schema(schema);
    tracing::debug!(sql = %ddl, "migrate");
    sqlx::query(&ddl).execute(pool).await?;

    for entity in registry.iter() {
        let collection = &entity.collection;
        let ddl = sql::create_table(schema, collection);
        tracing::debug!(sql = %ddl, "migrate");
        sqlx::query(&ddl).execute(pool).await?;

        for field in &collection.unique_fields {
            let ddl = sql::create_unique_index(schema, collection, field);
            tracing::debug!(sql = %ddl, "migrate");
            sqlx::query(&ddl).execute(pool).await?;
        }
        tracing::info!(schema = %schema, collection = %collection.name, "collection ready");
    }
    Ok(())
}
