//! Validation parameters.
//!
//! The `params` object of a requirements document is read into [`Params`]
//! as written, then resolved into a [`Config`] with defaults applied and
//! values sanitized.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use crate::version::CompareOperator;

/// Default text domain for user-facing strings.
pub const DEFAULT_LOCALE: &str = "wp-requirements";

/// Markup tags, stripped from the locale.
static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_REGEX must compile"));

/// URL scheme prefix.
static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("SCHEME_REGEX must compile")
});

/// Schemes a details link may use.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// The `params` object exactly as written in the document.
///
/// Each key is read on its own under its snake_case name or, failing that,
/// its camelCase alias. A key that is badly shaped is dropped without
/// affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params {
    /// Text domain for notice strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Link shown instead of the failure list
    #[serde(
        rename = "requirements_details_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub details_url: Option<String>,

    /// Operator for every version check except WordPress core
    #[serde(
        rename = "version_compare_operator",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_operator: Option<String>,

    /// Actions to run when validation fails
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_valid_actions: Vec<String>,

    /// Whether the notice also lists passing checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_valid_results: Option<bool>,
}

impl Params {
    /// Read params from a raw JSON value. Anything but an object is empty.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        Self {
            locale: pick(map, &["locale"], lenient::text_value),
            details_url: pick(
                map,
                &["requirements_details_url", "detailsUrl"],
                lenient::text_value,
            ),
            compare_operator: pick(
                map,
                &["version_compare_operator", "compareOperator"],
                lenient::text_value,
            ),
            not_valid_actions: pick(map, &["not_valid_actions", "notValidActions"], |v| {
                Some(lenient::names_value(v)).filter(|names| !names.is_empty())
            })
            .unwrap_or_default(),
            show_valid_results: pick(
                map,
                &["show_valid_results", "showValidResults"],
                lenient::truthy_value,
            ),
        }
    }

    /// Whether no param is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// First key, in order, whose value reads as a `T`.
fn pick<T>(
    map: &Map<String, Value>,
    keys: &[&str],
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|key| map.get(*key).and_then(&read))
}

/// Action to take when the requirements are not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotValidAction {
    /// Deactivate the host plugin.
    Deactivate,
    /// Show an admin notice listing the failures.
    AdminNotice,
}

impl NotValidAction {
    /// Look up an action by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "deactivate" => Some(NotValidAction::Deactivate),
            "admin_notice" => Some(NotValidAction::AdminNotice),
            _ => None,
        }
    }

    /// The configuration name of this action.
    pub fn name(self) -> &'static str {
        match self {
            NotValidAction::Deactivate => "deactivate",
            NotValidAction::AdminNotice => "admin_notice",
        }
    }
}

/// Resolved validation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Text domain for user-facing strings.
    pub locale: String,
    /// Optional link shown instead of the failure list.
    pub details_url: Option<String>,
    /// Operator applied to every version check except WordPress core.
    pub compare_operator: CompareOperator,
    /// Actions to run on failure, in order, without duplicates.
    pub not_valid_actions: Vec<NotValidAction>,
    /// Whether the notice also lists passing checks.
    pub show_valid_results: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            details_url: None,
            compare_operator: CompareOperator::default(),
            not_valid_actions: vec![NotValidAction::Deactivate, NotValidAction::AdminNotice],
            show_valid_results: false,
        }
    }
}

impl Config {
    /// Resolve params over the defaults. Empty values keep the default.
    pub fn from_params(params: &Params) -> Self {
        let mut config = Self::default();

        if let Some(locale) = params.locale.as_deref().map(sanitize_locale) {
            if !locale.is_empty() {
                config.locale = locale;
            }
        }

        config.details_url = params.details_url.as_deref().and_then(sanitize_url);

        if let Some(raw) = params.compare_operator.as_deref() {
            match raw.parse::<CompareOperator>() {
                Ok(op) => config.compare_operator = op,
                Err(e) => tracing::warn!("{}; using {}", e, config.compare_operator),
            }
        }

        if !params.not_valid_actions.is_empty() {
            let mut actions = Vec::new();
            for name in &params.not_valid_actions {
                match NotValidAction::from_name(name) {
                    Some(action) if !actions.contains(&action) => actions.push(action),
                    Some(_) => {}
                    None => tracing::debug!("Ignoring unknown not-valid action '{}'", name),
                }
            }
            config.not_valid_actions = actions;
        }

        if let Some(show) = params.show_valid_results {
            config.show_valid_results = show;
        }

        config
    }

    /// Whether a failure action is configured.
    pub fn has_action(&self, action: NotValidAction) -> bool {
        self.not_valid_actions.contains(&action)
    }
}

fn sanitize_locale(raw: &str) -> String {
    TAG_REGEX.replace_all(raw, "").trim().to_string()
}

fn sanitize_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return None;
    }

    if let Some(caps) = SCHEME_REGEX.captures(url) {
        let scheme = caps[1].to_ascii_lowercase();
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            tracing::warn!("Ignoring details URL with scheme '{}'", scheme);
            return None;
        }
    }

    Some(url.to_string())
}
