//! Catalog validation: entity naming, field uniqueness and numeric bounds.

use crate::config::{FieldType, FullConfig, RESERVED_FIELDS};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;

/// Paths the common routes already occupy under /api.
const RESERVED_ENTITY_NAMES: &[&str] = &["health", "ready", "version", "entities"];

fn invalid_field(entity: &str, field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        entity: entity.to_string(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let segment = Regex::new(r"^[a-z][a-z0-9_]*$").map_err(|e| ConfigError::Load(e.to_string()))?;
    let mut entity_names = HashSet::new();

    for e in &config.entities {
        if !segment.is_match(&e.name) || RESERVED_ENTITY_NAMES.contains(&e.name.as_str()) {
            return Err(ConfigError::InvalidName(e.name.clone()));
        }
        if !entity_names.insert(e.name.as_str()) {
            return Err(ConfigError::DuplicateEntity(e.name.clone()));
        }

        let mut field_names = HashSet::new();
        for f in &e.fields {
            if f.name.is_empty() {
                return Err(invalid_field(&e.name, &f.name, "empty field name"));
            }
            if RESERVED_FIELDS.contains(&f.name.as_str()) {
                return Err(invalid_field(&e.name, &f.name, "reserved field name"));
            }
            if !field_names.insert(f.name.as_str()) {
                return Err(invalid_field(&e.name, &f.name, "declared twice"));
            }
            if f.type_ != FieldType::Number && (f.min.is_some() || f.max.is_some()) {
                return Err(invalid_field(
                    &e.name,
                    &f.name,
                    format!("min/max only apply to number fields, not {}", f.type_.as_str()),
                ));
            }
            if let (Some(min), Some(max)) = (f.min, f.max) {
                if min > max {
                    return Err(invalid_field(&e.name, &f.name, format!("min {} exceeds max {}", min, max)));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntityConfig, FieldConfig};

    fn field(name: &str, type_: FieldType) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            type_,
            required: true,
            unique: false,
            min: None,
            max: None,
        }
    }

    fn config(entities: Vec<EntityConfig>) -> FullConfig {
        FullConfig { entities }
    }

    #[test]
    fn accepts_plain_catalog() {
        let c = config(vec![EntityConfig {
            name: "workouts".into(),
            fields: vec![field("workoutName", FieldType::Text), field("duration", FieldType::Number)],
        }]);
        assert!(validate(&c).is_ok());
    }

    #[test]
    fn rejects_duplicate_entity() {
        let e = EntityConfig {
            name: "goals".into(),
            fields: vec![],
        };
        let err = validate(&config(vec![e.clone(), e])).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateEntity(_)));
    }

    #[test]
    fn rejects_non_segment_names() {
        let e = EntityConfig {
            name: "Goals/2".into(),
            fields: vec![],
        };
        assert!(matches!(validate(&config(vec![e])), Err(ConfigError::InvalidName(_))));

        let e = EntityConfig {
            name: "health".into(),
            fields: vec![],
        };
        assert!(matches!(validate(&config(vec![e])), Err(ConfigError::InvalidName(_))));
    }

    #[test]
    fn rejects_reserved_and_repeated_fields() {
        let reserved = EntityConfig {
            name: "goals".into(),
            fields: vec![field("createdAt", FieldType::Date)],
        };
        assert!(matches!(validate(&config(vec![reserved])), Err(ConfigError::InvalidField { .. })));

        let repeated = EntityConfig {
            name: "goals".into(),
            fields: vec![field("goalName", FieldType::Text), field("goalName", FieldType::Text)],
        };
        assert!(matches!(validate(&config(vec![repeated])), Err(ConfigError::InvalidField { .. })));
    }

    #[test]
    fn rejects_bad_bounds() {
        let mut on_text = field("comment", FieldType::Text);
        on_text.max = Some(10.0);
        let e = EntityConfig {
            name: "feedbacks".into(),
            fields: vec![on_text],
        };
        assert!(validate(&config(vec![e])).is_err());

        let mut inverted = field("rating", FieldType::Number);
        inverted.min = Some(5.0);
        inverted.max = Some(1.0);
        let e = EntityConfig {
            name: "feedbacks".into(),
            fields: vec![inverted],
        };
        assert!(validate(&config(vec![e])).is_err());
    }
}
