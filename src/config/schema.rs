//! Requirements document schema.
//!
//! This module contains the struct definitions that map to the
//! `wp-requirements.json` document. Every field is optional and parsed on
//! its own, so unknown keys and badly shaped values are ignored instead of
//! rejecting the document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::params::Params;

/// Root of a requirements document.
///
/// # Example
///
/// ```
/// use wp_requirements::config::RequirementSpec;
///
/// let spec = RequirementSpec::from_json(r#"{
///     "php": { "version": "7.4", "extensions": ["curl"] },
///     "wordpress": { "plugins": { "foo/foo.php": "2.0" } }
/// }"#);
/// assert_eq!(spec.php.unwrap().version.as_deref(), Some("7.4"));
/// assert!(spec.mysql.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementSpec {
    /// Configuration overrides
    #[serde(
        deserialize_with = "lenient::object",
        skip_serializing_if = "Params::is_empty"
    )]
    pub params: Params,

    /// PHP runtime requirements
    #[serde(
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub php: Option<PhpRequirement>,

    /// MySQL server requirements
    #[serde(
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub mysql: Option<MysqlRequirement>,

    /// WordPress core, plugin and theme requirements
    #[serde(
        deserialize_with = "lenient::section",
        skip_serializing_if = "Option::is_none"
    )]
    pub wordpress: Option<WordpressRequirement>,
}

impl RequirementSpec {
    /// Parse a JSON document. Malformed JSON, or a top level that is not an
    /// object, yields an empty spec.
    pub fn from_json(content: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(content) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::warn!("Ignoring malformed requirements JSON: {}", e);
                Self::default()
            }
        }
    }

    /// Build a spec from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            tracing::warn!("Ignoring requirements document that is not a JSON object");
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Whether there are no params and no sections.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
            && self.php.is_none()
            && self.mysql.is_none()
            && self.wordpress.is_none()
    }

    /// Whether any section is present.
    pub fn has_sections(&self) -> bool {
        self.php.is_some() || self.mysql.is_some() || self.wordpress.is_some()
    }
}

/// PHP runtime requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpRequirement {
    /// Minimum PHP version (compared with the configured operator)
    #[serde(
        deserialize_with = "lenient::version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Extensions that must be loaded, in listed order
    #[serde(
        deserialize_with = "lenient::names",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extensions: Vec<String>,
}

/// MySQL server requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlRequirement {
    /// Minimum server version
    #[serde(
        deserialize_with = "lenient::version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

/// WordPress requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordpressRequirement {
    /// Minimum core version (always compared with `>=`)
    #[serde(
        deserialize_with = "lenient::version",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    /// Plugin basename (`dir/file.php`) to required version, in document
    /// order. `None` accepts any version of an active plugin.
    #[serde(
        deserialize_with = "lenient::plugin_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub plugins: IndexMap<String, Option<String>>,

    /// Theme slug (template or stylesheet) to required version, in
    /// document order. `None` accepts any version of the current theme.
    #[serde(
        deserialize_with = "lenient::version_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub theme: IndexMap<String, Option<String>>,
}
