//! ResourceController: generic CRUD + search driven by field descriptors.

mod controller;
mod search;
mod validation;
pub use controller::ResourceController;
pub use search::{like_pattern, SearchPlan, SubstringMatcher};
pub use validation::RequestValidator;
