//! wp-requirements - WordPress plugin requirement checking.
//!
//! Checks whether a WordPress host (PHP runtime, MySQL server, core, and
//! specific plugins and themes) meets a plugin's declared requirements,
//! then reacts to failures by deactivating the plugin and/or showing an
//! admin notice.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Requirement spec schema, params and file loading
//! - [`error`] - Error types and result aliases
//! - [`plugin`] - Host plugin identity and directory layout
//! - [`reactor`] - Failure actions and admin notices
//! - [`report`] - Human and JSON report formatters
//! - [`requirements`] - Environment probes and the validator
//! - [`version`] - Version comparison
//!
//! # Example
//!
//! ```
//! use wp_requirements::check_requirements;
//! use wp_requirements::config::RequirementSpec;
//! use wp_requirements::requirements::EnvironmentSnapshot;
//!
//! let spec = RequirementSpec::from_json(
//!     r#"{"php": {"version": "7.4"}, "mysql": {"version": "5.7"}}"#,
//! );
//!
//! let mut env = EnvironmentSnapshot::default();
//! env.php.version = "7.2.34".to_string();
//! env.mysql.server_info = "5.7.32-log".to_string();
//!
//! let outcome = check_requirements(&spec, &env);
//! assert!(!outcome.valid);
//! assert_eq!(outcome.results.php.unwrap().version, Some(false));
//! assert_eq!(outcome.results.mysql.unwrap().version, Some(true));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod plugin;
pub mod reactor;
pub mod report;
pub mod requirements;
pub mod version;

pub use error::{RequirementsError, Result};
pub use requirements::checker::{check_requirements, CheckOutcome};
