//! Persistence interface consumed by the resource controller, plus its backends.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::Collection;
use crate::error::AppError;
use crate::record::{Attributes, Record};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage for records, addressed by collection. Implementations assign ids and creation
/// timestamps, enforce the collection's unique fields, and serialize concurrent writes to
/// the same record (last write wins).
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, collection: &Collection, attrs: Attributes) -> Result<Record, AppError>;

    /// Every record; order is not part of the contract.
    async fn find_all(&self, collection: &Collection) -> Result<Vec<Record>, AppError>;

    async fn find_by_id(&self, collection: &Collection, id: Uuid) -> Result<Option<Record>, AppError>;

    /// Merge `attrs` into the stored record. `None` when the id does not resolve.
    async fn update_by_id(
        &self,
        collection: &Collection,
        id: Uuid,
        attrs: Attributes,
    ) -> Result<Option<Record>, AppError>;

    /// `false` when there was nothing to delete.
    async fn delete_by_id(&self, collection: &Collection, id: Uuid) -> Result<bool, AppError>;

    /// Records where any of `text_fields` contains `substring`, case-insensitively.
    async fn find_where_any_text_field_contains(
        &self,
        collection: &Collection,
        text_fields: &[&str],
        substring: &str,
    ) -> Result<Vec<Record>, AppError>;

    /// Cheap liveness check for the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
