//! Generic resource controller: the same create/list/get/update/delete/search algorithm for every entity.

use crate::config::EntityDescriptor;
use crate::error::AppError;
use crate::record::{parse_id, Record};
use crate::service::{RequestValidator, SearchPlan};
use crate::store::RecordStore;
use serde_json::{Map, Value};
use std::sync::Arc;

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// One per registered entity. Holds only the entity's descriptor and the store handle;
/// nothing is kept between requests.
#[derive(Clone)]
pub struct ResourceController {
    entity: Arc<EntityDescriptor>,
    store: Arc<dyn RecordStore>,
}

impl ResourceController {
    pub fn new(entity: Arc<EntityDescriptor>, store: Arc<dyn RecordStore>) -> Self {
        ResourceController { entity, store }
    }

    pub fn entity(&self) -> &EntityDescriptor {
        &self.entity
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::NotFound(format!("{} {}", self.entity.name, id))
    }

    pub async fn create(&self, payload: Value) -> Result<Record, AppError> {
        let body = body_to_map(payload)?;
        let attrs = RequestValidator::validate(&self.entity, &body)?;
        let record = self.store.insert(&self.entity.collection, attrs).await?;
        tracing::info!(entity = %self.entity.name, id = %record.id, "created");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<Record>, AppError> {
        self.store.find_all(&self.entity.collection).await
    }

    pub async fn get(&self, id: &str) -> Result<Record, AppError> {
        let uuid = parse_id(id)?;
        self.store
            .find_by_id(&self.entity.collection, uuid)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Merge update: supplied fields overwrite, everything else (id, createdAt, unsupplied fields) is kept.
    pub async fn update(&self, id: &str, payload: Value) -> Result<Record, AppError> {
        let uuid = parse_id(id)?;
        let body = body_to_map(payload)?;
        let patch = RequestValidator::validate_partial(&self.entity, &body)?;
        if patch.is_empty() {
            return self.get(id).await;
        }
        let record = self
            .store
            .update_by_id(&self.entity.collection, uuid, patch)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        tracing::info!(entity = %self.entity.name, id = %record.id, "updated");
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let uuid = parse_id(id)?;
        if !self.store.delete_by_id(&self.entity.collection, uuid).await? {
            return Err(self.not_found(id));
        }
        tracing::info!(entity = %self.entity.name, id = %uuid, "deleted");
        Ok(())
    }

    /// Case-insensitive substring search over the entity's Text fields. An entity without
    /// Text fields returns every record instead of none.
    pub async fn search(&self, query: &str) -> Result<Vec<Record>, AppError> {
        match SearchPlan::for_entity(&self.entity, query) {
            SearchPlan::MatchAll => {
                tracing::debug!(entity = %self.entity.name, "no text fields; search matches all");
                self.store.find_all(&self.entity.collection).await
            }
            SearchPlan::AnyTextFieldContains { fields, query } => {
                self.store
                    .find_where_any_text_field_contains(&self.entity.collection, &fields, query)
                    .await
            }
        }
    }
}
