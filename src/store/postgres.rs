//! PostgreSQL record store: one JSONB table per collection, inside one schema (`Settings::records_schema`).

use super::RecordStore;
use crate::config::Collection;
use crate::error::AppError;
use crate::record::{Attributes, Record};
use crate::service::like_pattern;
use crate::sql;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

type RecordRow = (Uuid, Value, DateTime<Utc>);

fn row_to_record((id, attributes, created_at): RecordRow) -> Record {
    let attributes = match attributes {
        Value::Object(map) => map,
        _ => Attributes::new(),
    };
    Record {
        id,
        attributes,
        created_at,
    }
}

/// Turn a unique index violation into a conflict naming the field; everything else stays a storage fault.
fn map_write_error(collection: &Collection, attrs: &Attributes, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = db
                .constraint()
                .and_then(|c| sql::field_for_constraint(collection, c))
                .or_else(|| collection.unique_fields.first().map(String::as_str))
                .unwrap_or("record")
                .to_string();
            let value = attrs
                .get(&field)
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .unwrap_or_default();
            return AppError::Conflict { field, value };
        }
    }
    AppError::Db(e)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, collection: &Collection, attrs: Attributes) -> Result<Record, AppError> {
        let sql = sql::insert(&self.schema, collection);
        let id = Uuid::new_v4();
        tracing::debug!(sql = %sql, id = %id, "query");
        let row: RecordRow = sqlx::query_as(&sql)
            .bind(id)
            .bind(Value::Object(attrs.clone()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, &attrs, e))?;
        Ok(row_to_record(row))
    }

    async fn find_all(&self, collection: &Collection) -> Result<Vec<Record>, AppError> {
        let sql = sql::select_all(&self.schema, collection);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<RecordRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn find_by_id(&self, collection: &Collection, id: Uuid) -> Result<Option<Record>, AppError> {
        let sql = sql::select_by_id(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row: Option<RecordRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(row_to_record))
    }

    async fn update_by_id(
        &self,
        collection: &Collection,
        id: Uuid,
        attrs: Attributes,
    ) -> Result<Option<Record>, AppError> {
        let sql = sql::update_merge(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row: Option<RecordRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(Value::Object(attrs.clone()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(collection, &attrs, e))?;
        Ok(row.map(row_to_record))
    }

    async fn delete_by_id(&self, collection: &Collection, id: Uuid) -> Result<bool, AppError> {
        let sql = sql::delete(&self.schema, collection);
        tracing::debug!(sql = %sql, id = %id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_where_any_text_field_contains(
        &self,
        collection: &Collection,
        text_fields: &[&str],
        substring: &str,
    ) -> Result<Vec<Record>, AppError> {
        if text_fields.is_empty() {
            return Ok(Vec::new());
        }
        let sql = sql::select_any_text_field_like(&self.schema, collection, text_fields);
        let pattern = like_pattern(substring);
        tracing::debug!(sql = %sql, pattern = %pattern, "query");
        let rows: Vec<RecordRow> = sqlx::query_as(&sql).bind(pattern).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// `postgres` maintenance database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = maintenance_target(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connection options for the `postgres` database plus the database to create.
/// `None` when the URL names no database or names `postgres` itself.
fn maintenance_target(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Persistence(format!("invalid DATABASE_URL: {}", e)))?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}
