pub mod types;
pub mod loader;
pub mod validator;
pub mod registry;
pub mod settings;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use registry::*;
pub use settings::Settings;
