//! Entity schema registry: catalog validated and flattened for runtime use.

use crate::config::FieldType;
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Wire name of the record identifier.
pub const ID_FIELD: &str = "_id";
/// Wire name of the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

pub const RESERVED_FIELDS: &[&str] = &[ID_FIELD, CREATED_AT_FIELD];

/// One attribute of one entity. Immutable after registration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldDescriptor {
    fn new(name: &str, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            field_type,
            required: false,
            unique: false,
            min: None,
            max: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Inclusive numeric bounds.
    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Storage-side handle for one entity's records: the collection name plus the
/// fields the store must keep unique across the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub unique_fields: Vec<String>,
}

impl Collection {
    pub fn new(name: &str) -> Self {
        Collection {
            name: name.to_string(),
            unique_fields: Vec::new(),
        }
    }

    /// Collection named `name` with a uniqueness constraint for every field flagged unique.
    pub fn for_fields(name: &str, fields: &[FieldDescriptor]) -> Self {
        Collection {
            name: name.to_string(),
            unique_fields: fields.iter().filter(|f| f.unique).map(|f| f.name.clone()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    pub name: String,
    /// Declaration order is kept for display; correctness never depends on it.
    pub fields: Vec<FieldDescriptor>,
    pub collection: Collection,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields eligible for free-text search: Text fields, never the id or creation timestamp.
    pub fn search_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !RESERVED_FIELDS.contains(&f.name.as_str()))
            .filter(|f| f.field_type == FieldType::Text)
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// Immutable once built; handed to the routes and controllers rather than kept as a global.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Arc<EntityDescriptor>>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Registering the same name twice is a startup error.
    pub fn register(
        &mut self,
        name: &str,
        fields: Vec<FieldDescriptor>,
        collection: Collection,
    ) -> Result<Arc<EntityDescriptor>, ConfigError> {
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateEntity(name.to_string()));
        }
        let entity = Arc::new(EntityDescriptor {
            name: name.to_string(),
            fields,
            collection,
        });
        self.by_name.insert(name.to_string(), self.entities.len());
        self.entities.push(entity.clone());
        tracing::debug!(entity = %name, fields = entity.fields.len(), "registered entity");
        Ok(entity)
    }

    pub fn resolve(&self, name: &str) -> Option<&Arc<EntityDescriptor>> {
        self.by_name.get(name).map(|&i| &self.entities[i])
    }

    /// Entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDescriptor>> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
