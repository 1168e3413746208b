//! Requirement validation against a host environment.
//!
//! This module answers whether a WordPress host meets a plugin's declared
//! PHP, MySQL, core, plugin and theme requirements.
//!
//! # Modules
//!
//! - [`probe`] - Read-only environment queries the checker depends on
//! - [`snapshot`] - A probe backed by a recorded JSON snapshot
//! - [`headers`] - WordPress file header parsing
//! - [`status`] - Result and required-value trees
//! - [`checker`] - The validator
//! - [`check`] - Per-plugin check: load, validate, react

pub mod check;
pub mod checker;
pub mod headers;
pub mod probe;
pub mod snapshot;
pub mod status;

pub use check::RequirementsCheck;
pub use checker::{check_requirements, CheckOutcome, RequirementChecker, Validation};
pub use probe::EnvironmentProbe;
pub use snapshot::EnvironmentSnapshot;
pub use status::{RequiredTree, ResultTree};
