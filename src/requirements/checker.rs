//! Requirement validation.
//!
//! The [`RequirementChecker`] walks a [`RequirementSpec`] section by section,
//! asks the [`EnvironmentProbe`] about each requirement, and builds a
//! [`ResultTree`] of the same shape. Nothing here fails: an unmet or
//! unknowable requirement is a `false` leaf.

use serde::Serialize;

use crate::config::params::Config;
use crate::config::schema::{
    MysqlRequirement, PhpRequirement, RequirementSpec, WordpressRequirement,
};
use crate::requirements::probe::EnvironmentProbe;
use crate::requirements::status::{
    MysqlResults, PhpResults, RequiredTree, ResultTree, WordpressResults,
};
use crate::version::{version_compare, CompareOperator};

/// Core version checks always use this operator, whatever is configured.
pub const CORE_COMPARE_OPERATOR: CompareOperator = CompareOperator::Ge;

/// Output of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Boolean outcome per requirement.
    pub results: ResultTree,
    /// Required value per requirement.
    pub required: RequiredTree,
}

impl Validation {
    /// Whether every requirement is met.
    pub fn is_valid(&self) -> bool {
        self.results.is_valid()
    }
}

/// The answer to "does this host meet these requirements?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Whether every requirement is met.
    pub valid: bool,
    /// Outcome per requirement.
    pub results: ResultTree,
}

/// Check requirements against a probe, configured by their own params.
///
/// # Example
///
/// ```
/// use wp_requirements::check_requirements;
/// use wp_requirements::config::RequirementSpec;
/// use wp_requirements::requirements::snapshot::EnvironmentSnapshot;
///
/// let spec = RequirementSpec::from_json(r#"{"php": {"version": "7.4"}}"#);
/// let mut env = EnvironmentSnapshot::default();
/// env.php.version = "8.2.0".to_string();
///
/// let outcome = check_requirements(&spec, &env);
/// assert!(outcome.valid);
/// ```
pub fn check_requirements(spec: &RequirementSpec, probe: &dyn EnvironmentProbe) -> CheckOutcome {
    let config = Config::from_params(&spec.params);
    let validation = RequirementChecker::new(probe, &config).validate(spec);
    CheckOutcome {
        valid: validation.is_valid(),
        results: validation.results,
    }
}

/// Validates requirement specs against an environment probe.
pub struct RequirementChecker<'a> {
    probe: &'a dyn EnvironmentProbe,
    operator: CompareOperator,
}

impl<'a> RequirementChecker<'a> {
    /// Create a checker using the config's compare operator.
    pub fn new(probe: &'a dyn EnvironmentProbe, config: &Config) -> Self {
        Self {
            probe,
            operator: config.compare_operator,
        }
    }

    /// Validate every section present in the requirements.
    ///
    /// Sections that were not required are absent from the result.
    pub fn validate(&self, spec: &RequirementSpec) -> Validation {
        let mut validation = Validation::default();

        if let Some(php) = &spec.php {
            validation.results.php = Some(self.check_php(php));
            validation.required.php = Some(php.clone());
        }

        if let Some(mysql) = &spec.mysql {
            validation.results.mysql = Some(self.check_mysql(mysql));
            validation.required.mysql = Some(mysql.clone());
        }

        if let Some(wordpress) = &spec.wordpress {
            validation.results.wordpress = Some(self.check_wordpress(wordpress));
            validation.required.wordpress = Some(wordpress.clone());
        }

        validation
    }

    fn compare(&self, current: Option<&str>, required: &str, operator: CompareOperator) -> bool {
        match current {
            Some(current) => version_compare(current, required, operator),
            None => false,
        }
    }

    fn check_php(&self, php: &PhpRequirement) -> PhpResults {
        let mut results = PhpResults::default();

        if let Some(required) = &php.version {
            let current = self.probe.php_version();
            let ok = self.compare(Some(current.as_str()), required, self.operator);
            tracing::debug!(
                "PHP version {} {} {}: {}",
                current,
                self.operator,
                required,
                ok
            );
            results.version = Some(ok);
        }

        for extension in &php.extensions {
            let loaded = self.probe.is_extension_loaded(extension);
            tracing::debug!("PHP extension {} loaded: {}", extension, loaded);
            results.extensions.insert(extension.clone(), loaded);
        }

        results
    }

    fn check_mysql(&self, mysql: &MysqlRequirement) -> MysqlResults {
        let mut results = MysqlResults::default();

        if let Some(required) = &mysql.version {
            let current = self.probe.mysql_version();
            let ok = self.compare(Some(current.as_str()), required, self.operator);
            tracing::debug!(
                "MySQL version {} {} {}: {}",
                current,
                self.operator,
                required,
                ok
            );
            results.version = Some(ok);
        }

        results
    }

    fn check_wordpress(&self, wordpress: &WordpressRequirement) -> WordpressResults {
        let mut results = WordpressResults::default();

        if let Some(required) = &wordpress.version {
            let current = self.probe.core_version();
            let ok = self.compare(Some(current.as_str()), required, CORE_COMPARE_OPERATOR);
            tracing::debug!(
                "WordPress version {} {} {}: {}",
                current,
                CORE_COMPARE_OPERATOR,
                required,
                ok
            );
            results.version = Some(ok);
        }

        for (slug, required) in &wordpress.plugins {
            let ok = self.check_plugin(slug, required.as_deref());
            results.plugins.insert(slug.clone(), ok);
        }

        for (slug, required) in &wordpress.theme {
            let ok = self.check_theme(slug, required.as_deref());
            results.theme.insert(slug.clone(), ok);
        }

        results
    }

    /// Compare against an optional requirement. No requirement accepts any
    /// version, including an unknown one.
    fn meets(&self, current: Option<&str>, required: Option<&str>) -> bool {
        match required {
            Some(required) => self.compare(current, required, self.operator),
            None => true,
        }
    }

    fn check_plugin(&self, slug: &str, required: Option<&str>) -> bool {
        if !self.probe.plugin_exists(slug) {
            tracing::debug!("Plugin {} is not installed", slug);
            return false;
        }

        let active = self.probe.is_plugin_active(slug);
        let version = self.probe.plugin_version(slug);
        let ok = active && self.meets(version.as_deref(), required);
        tracing::debug!(
            "Plugin {} active: {}, version {:?} {} {:?}: {}",
            slug,
            active,
            version,
            self.operator,
            required,
            ok
        );
        ok
    }

    fn check_theme(&self, slug: &str, required: Option<&str>) -> bool {
        let template = self.probe.current_theme_template_slug();
        let stylesheet = self.probe.current_theme_stylesheet_slug();
        let is_current =
            template.as_deref() == Some(slug) || stylesheet.as_deref() == Some(slug);

        if !is_current {
            tracing::debug!("Theme {} is neither the template nor the stylesheet", slug);
            return false;
        }

        let version = self.probe.current_theme_version();
        let ok = self.meets(version.as_deref(), required);
        tracing::debug!(
            "Theme {} version {:?} {} {:?}: {}",
            slug,
            version,
            self.operator,
            required,
            ok
        );
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::snapshot::{EnvironmentSnapshot, PluginSnapshot, ThemeSnapshot};
    use serde_json::json;

    fn env() -> EnvironmentSnapshot {
        let mut env = EnvironmentSnapshot::default();
        env.php.version = "7.2.34".into();
        env.php.extensions = vec!["curl".into(), "json".into()];
        env.mysql.server_info = "5.7.32-log".into();
        env.wordpress.version = "6.4.2".into();
        env.wordpress.plugins.insert(
            "foo/foo.php".into(),
            PluginSnapshot {
                version: Some("1.5".into()),
                active: false,
                name: None,
            },
        );
        env.wordpress.plugins.insert(
            "bar/bar.php".into(),
            PluginSnapshot {
                version: Some("3.0".into()),
                active: true,
                name: None,
            },
        );
        env.wordpress.theme = ThemeSnapshot {
            template: Some("parent-theme".into()),
            stylesheet: Some("child-theme".into()),
            version: Some("1.2".into()),
            name: None,
        };
        env
    }

    fn validate(spec: serde_json::Value, env: &EnvironmentSnapshot) -> Validation {
        let spec = RequirementSpec::from_value(spec);
        let config = Config::from_params(&spec.params);
        RequirementChecker::new(env, &config).validate(&spec)
    }

    #[test]
    fn empty_spec_is_vacuously_valid() {
        let outcome = check_requirements(&RequirementSpec::default(), &env());
        assert!(outcome.valid);
        assert_eq!(serde_json::to_value(&outcome.results).unwrap(), json!({}));
    }

    #[test]
    fn php_version_uses_configured_operator() {
        let env = env();
        assert_eq!(
            validate(json!({"php": {"version": "7.4"}}), &env).results.php.unwrap().version,
            Some(false)
        );
        assert_eq!(
            validate(
                json!({"params": {"compareOperator": "<"}, "php": {"version": "7.4"}}),
                &env
            )
            .results
            .php
            .unwrap()
            .version,
            Some(true)
        );
    }

    #[test]
    fn extensions_are_checked_by_name() {
        let results = validate(json!({"php": {"extensions": ["curl", "gd", 5]}}), &env())
            .results
            .php
            .unwrap();
        assert_eq!(results.extensions.len(), 2);
        assert!(results.extensions["curl"]);
        assert!(!results.extensions["gd"]);
    }

    #[test]
    fn mysql_version_ignores_vendor_suffix() {
        let results = validate(json!({"mysql": {"version": "5.7.32"}}), &env());
        assert_eq!(results.results.mysql.unwrap().version, Some(true));
    }

    #[test]
    fn core_version_always_uses_ge() {
        let env = env();
        let spec = json!({
            "params": {"compareOperator": "<"},
            "wordpress": {"version": "6.0"}
        });
        assert_eq!(validate(spec, &env).results.wordpress.unwrap().version, Some(true));

        let spec = json!({
            "params": {"compareOperator": ">"},
            "wordpress": {"version": "6.4.2"}
        });
        assert_eq!(validate(spec, &env).results.wordpress.unwrap().version, Some(true));
    }

    #[test]
    fn missing_plugin_is_false() {
        let results = validate(json!({"wordpress": {"plugins": {"baz/baz.php": "1.0"}}}), &env());
        assert!(!results.results.wordpress.unwrap().plugins["baz/baz.php"]);
    }

    #[test]
    fn inactive_plugin_is_false_even_when_new_enough() {
        let results = validate(json!({"wordpress": {"plugins": {"foo/foo.php": "1.0"}}}), &env());
        assert!(!results.results.wordpress.unwrap().plugins["foo/foo.php"]);
    }

    #[test]
    fn active_plugin_compares_version() {
        let env = env();
        let ok = validate(json!({"wordpress": {"plugins": {"bar/bar.php": "2.5"}}}), &env);
        assert!(ok.results.wordpress.unwrap().plugins["bar/bar.php"]);

        let old = validate(json!({"wordpress": {"plugins": {"bar/bar.php": "3.1"}}}), &env);
        assert!(!old.results.wordpress.unwrap().plugins["bar/bar.php"]);
    }

    #[test]
    fn active_plugin_with_unknown_version_is_false() {
        let mut env = env();
        env.wordpress.plugins.get_mut("bar/bar.php").unwrap().version = None;
        let results = validate(json!({"wordpress": {"plugins": {"bar/bar.php": "1.0"}}}), &env);
        assert!(!results.results.wordpress.unwrap().plugins["bar/bar.php"]);
    }

    #[test]
    fn parent_theme_slug_matches() {
        let results = validate(json!({"wordpress": {"theme": {"parent-theme": "1.0"}}}), &env());
        assert!(results.results.wordpress.unwrap().theme["parent-theme"]);
    }

    #[test]
    fn stylesheet_slug_matches() {
        let results = validate(json!({"wordpress": {"theme": {"child-theme": "1.2"}}}), &env());
        assert!(results.results.wordpress.unwrap().theme["child-theme"]);
    }

    #[test]
    fn other_theme_slug_is_false() {
        let results = validate(json!({"wordpress": {"theme": {"storefront": "1.0"}}}), &env());
        assert!(!results.results.wordpress.unwrap().theme["storefront"]);
    }

    #[test]
    fn current_theme_too_old_is_false() {
        let results = validate(json!({"wordpress": {"theme": {"parent-theme": "2.0"}}}), &env());
        assert!(!results.results.wordpress.unwrap().theme["parent-theme"]);
    }

    #[test]
    fn plugin_without_version_must_still_be_installed_and_active() {
        let env = env();
        let spec = json!({"wordpress": {"plugins": {
            "baz/baz.php": "",
            "foo/foo.php": null,
            "bar/bar.php": ""
        }}});
        let plugins = validate(spec, &env).results.wordpress.unwrap().plugins;
        assert!(!plugins["baz/baz.php"], "missing plugin");
        assert!(!plugins["foo/foo.php"], "inactive plugin");
        assert!(plugins["bar/bar.php"], "active plugin, any version");
    }

    #[test]
    fn active_plugin_without_version_accepts_unknown_version() {
        let mut env = env();
        env.wordpress.plugins.get_mut("bar/bar.php").unwrap().version = None;
        let results = validate(json!({"wordpress": {"plugins": {"bar/bar.php": ""}}}), &env);
        assert!(results.results.wordpress.unwrap().plugins["bar/bar.php"]);
    }

    #[test]
    fn theme_without_version_must_still_match() {
        let env = env();
        let spec = json!({"wordpress": {"theme": {"storefront": null, "parent-theme": ""}}});
        let theme = validate(spec, &env).results.wordpress.unwrap().theme;
        assert!(!theme["storefront"]);
        assert!(theme["parent-theme"]);
    }

    #[test]
    fn empty_version_requirements_against_empty_environment_fail() {
        let spec = RequirementSpec::from_value(json!({
            "wordpress": {
                "plugins": {"woocommerce/woocommerce.php": ""},
                "theme": {"storefront": null}
            }
        }));
        let outcome = check_requirements(&spec, &EnvironmentSnapshot::default());
        assert!(!outcome.valid);
        assert_eq!(
            serde_json::to_value(&outcome.results).unwrap(),
            json!({"wordpress": {
                "plugins": {"woocommerce/woocommerce.php": false},
                "theme": {"storefront": false}
            }})
        );
    }

    #[test]
    fn results_follow_document_order() {
        let spec = json!({"wordpress": {"plugins": {"foo/foo.php": "1", "bar/bar.php": "1", "baz/baz.php": "1"}}});
        let plugins = validate(spec, &env()).results.wordpress.unwrap().plugins;
        assert_eq!(
            plugins.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["foo/foo.php", "bar/bar.php", "baz/baz.php"]
        );
    }

    #[test]
    fn required_tree_records_requirements() {
        let validation = validate(
            json!({
                "php": {"version": "7.4", "extensions": ["curl"]},
                "wordpress": {"plugins": {"foo/foo.php": "2.0"}}
            }),
            &env(),
        );
        let php = validation.required.php.unwrap();
        assert_eq!(php.version.as_deref(), Some("7.4"));
        assert_eq!(php.extensions, vec!["curl"]);
        assert_eq!(
            validation.required.wordpress.unwrap().plugins["foo/foo.php"].as_deref(),
            Some("2.0")
        );
        assert!(validation.required.mysql.is_none());
    }

    #[test]
    fn sections_present_without_leaves_are_kept() {
        let validation = validate(json!({"php": {}, "mysql": {"version": ""}}), &env());
        assert!(validation.results.php.is_some());
        assert_eq!(validation.results.mysql.as_ref().unwrap().version, None);
        assert!(validation.is_valid());
    }

    #[test]
    fn failing_scenario_from_plugin_and_php() {
        let spec = RequirementSpec::from_value(json!({
            "php": {"version": "7.4"},
            "wordpress": {"plugins": {"foo/foo.php": "2.0"}}
        }));
        let outcome = check_requirements(&spec, &env());
        assert!(!outcome.valid);
        assert_eq!(
            serde_json::to_value(&outcome.results).unwrap(),
            json!({"php": {"version": false}, "wordpress": {"plugins": {"foo/foo.php": false}}})
        );
    }

    #[test]
    fn outcome_serializes_valid_flag() {
        let outcome = check_requirements(&RequirementSpec::default(), &env());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"valid": true, "results": {}})
        );
    }
}
