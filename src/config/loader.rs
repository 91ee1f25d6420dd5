//! Load the entity catalog from the embedded document or a JSON file, and build the registry.

use crate::config::{validate, Collection, EntityRegistry, FieldDescriptor, FullConfig};
use crate::error::ConfigError;
use std::path::Path;

/// The nine entities the service ships with.
const BUILTIN_ENTITIES: &str = include_str!("entities.json");

pub fn builtin_config() -> Result<FullConfig, ConfigError> {
    parse_config(BUILTIN_ENTITIES)
}

pub fn parse_config(json: &str) -> Result<FullConfig, ConfigError> {
    serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<FullConfig, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading entity catalog");
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_config(&raw)
}

/// Build the registry from a catalog (validates first). Entities are registered in document order.
pub fn resolve(config: &FullConfig) -> Result<EntityRegistry, ConfigError> {
    validate(config)?;

    let mut registry = EntityRegistry::new();
    for e in &config.entities {
        let fields: Vec<FieldDescriptor> = e
            .fields
            .iter()
            .map(|f| FieldDescriptor {
                name: f.name.clone(),
                field_type: f.type_,
                required: f.required,
                unique: f.unique,
                min: f.min,
                max: f.max,
            })
            .collect();
        let collection = Collection::for_fields(&e.name, &fields);
        registry.register(&e.name, fields, collection)?;
    }
    Ok(registry)
}
