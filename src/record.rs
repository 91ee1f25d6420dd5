//! Persisted record shape and identifier parsing.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field name to value, already validated and shaped against the entity's fields.
pub type Attributes = Map<String, Value>;

/// One persisted instance of an entity. Serializes flat: `_id`, the attributes, `createdAt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(attributes: Attributes) -> Self {
        Record {
            id: Uuid::new_v4(),
            attributes,
            created_at: Utc::now(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Overwrite supplied attributes, keep everything else. Id and creation time never change.
    pub fn merge(&mut self, patch: Attributes) {
        for (k, v) in patch {
            self.attributes.insert(k, v);
        }
    }
}

/// Parse a path id. Anything that is not a UUID cannot name a record.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat_with_mongo_style_id() {
        let mut attrs = Attributes::new();
        attrs.insert("goalName".into(), json!("Run 5k"));
        let record = Record::new(attrs);
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["_id"], json!(record.id.to_string()));
        assert_eq!(v["goalName"], json!("Run 5k"));
        assert!(v["createdAt"].is_string());
        assert!(v.get("attributes").is_none());
    }

    #[test]
    fn merge_preserves_identity() {
        let mut attrs = Attributes::new();
        attrs.insert("stock".into(), json!(3));
        attrs.insert("category".into(), json!("bands"));
        let mut record = Record::new(attrs);
        let (id, created) = (record.id, record.created_at);

        let mut patch = Attributes::new();
        patch.insert("stock".into(), json!(9));
        record.merge(patch);

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created);
        assert_eq!(record.get("stock"), Some(&json!(9)));
        assert_eq!(record.get("category"), Some(&json!("bands")));
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::InvalidId(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
