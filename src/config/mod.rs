//! Requirements documents: schema, params and file loading.
//!
//! # Modules
//!
//! - [`schema`] - `RequirementSpec` and its per-section structs
//! - [`params`] - `Params` as written and the resolved `Config`
//! - [`loader`] - `wp-requirements.json` discovery and loading
//! - [`lenient`] - Tolerant field deserializers

pub mod lenient;
pub mod loader;
pub mod params;
pub mod schema;

pub use loader::{load_requirements_file, RequirementLoader, SearchPaths, REQUIREMENTS_FILE};
pub use params::{Config, NotValidAction, Params, DEFAULT_LOCALE};
pub use schema::{MysqlRequirement, PhpRequirement, RequirementSpec, WordpressRequirement};
