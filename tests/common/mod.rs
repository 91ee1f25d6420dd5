//! Shared fixtures: registries, stores and payloads built from field descriptors.

#![allow(dead_code)]

use fitness_records::{
    builtin_config, resolve, AppState, Collection, EntityDescriptor, EntityRegistry, FieldDescriptor, FieldType,
    InMemoryStore, RecordStore, ResourceController,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub fn builtin_registry() -> EntityRegistry {
    resolve(&builtin_config().expect("builtin catalog parses")).expect("builtin catalog resolves")
}

pub fn builtin_state() -> AppState {
    AppState::new(builtin_registry(), Arc::new(InMemoryStore::new()))
}

/// Controller for one built-in entity over a fresh in-memory store.
pub fn controller(entity: &str) -> ResourceController {
    let registry = builtin_registry();
    let descriptor = registry.resolve(entity).expect("entity registered").clone();
    ResourceController::new(descriptor, Arc::new(InMemoryStore::new()))
}

pub fn controller_with_store(entity: Arc<EntityDescriptor>, store: Arc<dyn RecordStore>) -> ResourceController {
    ResourceController::new(entity, store)
}

/// An isolated entity with no Text fields.
pub fn measurements() -> Arc<EntityDescriptor> {
    let mut registry = EntityRegistry::new();
    let fields = vec![
        FieldDescriptor::number("weightKg").required(),
        FieldDescriptor::date("measuredOn").required(),
    ];
    registry
        .register("measurements", fields, Collection::new("measurements"))
        .expect("register measurements")
}

/// A valid value for a field, varied by `n` so unique fields don't collide.
pub fn sample_value(field: &FieldDescriptor, n: usize) -> Value {
    match field.field_type {
        FieldType::Text => json!(format!("{} sample {}", field.name, n)),
        FieldType::Number => json!(field.min.unwrap_or(1.0) as i64),
        FieldType::Date => json!("2024-05-01"),
    }
}

/// Payload with every declared field set to a valid value.
pub fn valid_payload(entity: &EntityDescriptor, n: usize) -> Map<String, Value> {
    entity
        .fields
        .iter()
        .map(|f| (f.name.clone(), sample_value(f, n)))
        .collect()
}
