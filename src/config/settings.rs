//! Runtime settings read from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
const DEFAULT_RECORDS_SCHEMA: &str = "records";

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// When set, records live in PostgreSQL; otherwise in process memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// PostgreSQL schema holding the collection tables.
    pub records_schema: String,
    /// Replaces the built-in entity catalog.
    pub entities_path: Option<PathBuf>,
    pub body_limit: usize,
}

impl Settings {
    /// BIND_ADDR, DATABASE_URL, DATABASE_MAX_CONNECTIONS, RECORDS_SCHEMA, ENTITIES_PATH, BODY_LIMIT_BYTES.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| ConfigError::Load(format!("BIND_ADDR: {}", e)))?;
        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .map_err(|e| ConfigError::Load(format!("DATABASE_MAX_CONNECTIONS: {}", e)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse()
                .map_err(|e| ConfigError::Load(format!("BODY_LIMIT_BYTES: {}", e)))?,
            None => DEFAULT_BODY_LIMIT,
        };
        let records_schema = get("RECORDS_SCHEMA")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RECORDS_SCHEMA.into());
        if !is_identifier(&records_schema) {
            return Err(ConfigError::Load(format!("RECORDS_SCHEMA: invalid schema name '{}'", records_schema)));
        }
        Ok(Settings {
            bind_addr,
            database_url: get("DATABASE_URL").filter(|s| !s.is_empty()),
            max_connections,
            records_schema,
            entities_path: get("ENTITIES_PATH").filter(|s| !s.is_empty()).map(PathBuf::from),
            body_limit,
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
