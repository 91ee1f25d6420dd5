//! Builds the SQL for one collection table. Identifiers come from the catalog only; values are bound as parameters.

use crate::config::Collection;

/// Columns every collection table returns, in row-tuple order.
const RECORD_COLUMNS: &str = "id, attributes, created_at";

/// Quote identifier for PostgreSQL (safe: only from config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Quote a string literal (used for JSON keys, which come from config).
fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// `attributes->>'field'`: the field's value as text.
fn attribute_text(field: &str) -> String {
    format!("(attributes->>{})", literal(field))
}

pub fn unique_index_name(collection: &Collection, field: &str) -> String {
    format!("{}_{}_key", collection.name, field)
}

/// Map a violated unique index back to the field it guards.
pub fn field_for_constraint<'a>(collection: &'a Collection, constraint: &str) -> Option<&'a str> {
    collection
        .unique_fields
        .iter()
        .find(|f| unique_index_name(collection, f) == constraint)
        .map(String::as_str)
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema))
}

pub fn create_table(schema: &str, collection: &Collection) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            attributes JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        qualified_table(schema, &collection.name)
    )
}

pub fn create_unique_index(schema: &str, collection: &Collection, field: &str) -> String {
    format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
        quoted(&unique_index_name(collection, field)),
        qualified_table(schema, &collection.name),
        attribute_text(field)
    )
}

/// $1 id, $2 attributes.
pub fn insert(schema: &str, collection: &Collection) -> String {
    format!(
        "INSERT INTO {} (id, attributes) VALUES ($1, $2) RETURNING {}",
        qualified_table(schema, &collection.name),
        RECORD_COLUMNS
    )
}

pub fn select_all(schema: &str, collection: &Collection) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY created_at, id",
        RECORD_COLUMNS,
        qualified_table(schema, &collection.name)
    )
}

/// $1 id.
pub fn select_by_id(schema: &str, collection: &Collection) -> String {
    format!(
        "SELECT {} FROM {} WHERE id = $1",
        RECORD_COLUMNS,
        qualified_table(schema, &collection.name)
    )
}

/// $1 id, $2 attributes to merge over the stored ones.
pub fn update_merge(schema: &str, collection: &Collection) -> String {
    format!(
        "UPDATE {} SET attributes = attributes || $2 WHERE id = $1 RETURNING {}",
        qualified_table(schema, &collection.name),
        RECORD_COLUMNS
    )
}

/// $1 id.
pub fn delete(schema: &str, collection: &Collection) -> String {
    format!("DELETE FROM {} WHERE id = $1", qualified_table(schema, &collection.name))
}

/// $1 ILIKE pattern. `text_fields` must be non-empty.
pub fn select_any_text_field_like(schema: &str, collection: &Collection, text_fields: &[&str]) -> String {
    let predicate = text_fields
        .iter()
        .map(|f| format!("{} ILIKE $1", attribute_text(f)))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!(
        "SELECT {} FROM {} WHERE {} ORDER BY created_at, id",
        RECORD_COLUMNS,
        qualified_table(schema, &collection.name),
        predicate
    )
}
