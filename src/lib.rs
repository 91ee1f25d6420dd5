//! Schema-driven record backend: one generic CRUD + search controller over configured entities.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod record;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{
    builtin_config, load_from_path, resolve, Collection, EntityDescriptor, EntityRegistry, FieldDescriptor,
    FieldType, FullConfig, Settings,
};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use record::{Attributes, Record};
pub use routes::{api_router, app_router, common_routes, entity_routes, resource_routes};
pub use service::ResourceController;
pub use state::AppState;
pub use store::{ensure_database_exists, InMemoryStore, PgStore, RecordStore};
