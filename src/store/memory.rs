//! In-memory record store for development and tests.

use super::RecordStore;
use crate::config::Collection;
use crate::error::AppError;
use crate::record::{Attributes, Record};
use crate::service::SubstringMatcher;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Records = IndexMap<Uuid, Record>;

/// Collections keyed by name, each in insertion order. Uses RwLock for thread-safe access;
/// every write holds the lock for the whole check-and-write, so same-record writes are serialized.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Records>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> AppError {
    AppError::Persistence(format!("store lock poisoned: {}", e))
}

/// Reject `attrs` if a unique field's value is already held by another record.
fn check_unique(
    records: Option<&Records>,
    collection: &Collection,
    attrs: &Attributes,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    let Some(records) = records else {
        return Ok(());
    };
    for field in &collection.unique_fields {
        let Some(value) = attrs.get(field) else {
            continue;
        };
        let taken = records
            .values()
            .filter(|r| Some(r.id) != except)
            .any(|r| r.get(field) == Some(value));
        if taken {
            return Err(AppError::Conflict {
                field: field.clone(),
                value: value.as_str().map(String::from).unwrap_or_else(|| value.to_string()),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert(&self, collection: &Collection, attrs: Attributes) -> Result<Record, AppError> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        check_unique(collections.get(&collection.name), collection, &attrs, None)?;
        let record = Record::new(attrs);
        collections
            .entry(collection.name.clone())
            .or_default()
            .insert(record.id, record.clone());
        tracing::debug!(collection = %collection.name, id = %record.id, "insert");
        Ok(record)
    }

    async fn find_all(&self, collection: &Collection) -> Result<Vec<Record>, AppError> {
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections
            .get(&collection.name)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &Collection, id: Uuid) -> Result<Option<Record>, AppError> {
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections.get(&collection.name).and_then(|records| records.get(&id).cloned()))
    }

    async fn update_by_id(
        &self,
        collection: &Collection,
        id: Uuid,
        attrs: Attributes,
    ) -> Result<Option<Record>, AppError> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        let Some(records) = collections.get_mut(&collection.name) else {
            return Ok(None);
        };
        if !records.contains_key(&id) {
            return Ok(None);
        }
        check_unique(Some(&*records), collection, &attrs, Some(id))?;
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        record.merge(attrs);
        tracing::debug!(collection = %collection.name, id = %id, "update");
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, collection: &Collection, id: Uuid) -> Result<bool, AppError> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        let removed = collections
            .get_mut(&collection.name)
            .and_then(|records| records.shift_remove(&id))
            .is_some();
        tracing::debug!(collection = %collection.name, id = %id, removed, "delete");
        Ok(removed)
    }

    async fn find_where_any_text_field_contains(
        &self,
        collection: &Collection,
        text_fields: &[&str],
        substring: &str,
    ) -> Result<Vec<Record>, AppError> {
        let matcher = SubstringMatcher::new(substring)?;
        let collections = self.collections.read().map_err(lock_error)?;
        Ok(collections
            .get(&collection.name)
            .map(|records| {
                records
                    .values()
                    .filter(|r| matcher.matches_any(r, text_fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.collections.read().map(|_| ()).map_err(lock_error)
    }
}
