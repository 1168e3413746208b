//! Environment probe interface.
//!
//! The checker never looks at ambient host state. Everything it needs to
//! know about the running PHP, database, core install, plugins and theme is
//! asked through [`EnvironmentProbe`], so a check can run against a live
//! host, a recorded snapshot, or a test double.
//!
//! All queries are read-only.

/// Read-only queries against the host platform.
pub trait EnvironmentProbe {
    /// Running PHP version.
    fn php_version(&self) -> String;

    /// Whether a PHP extension is loaded.
    fn is_extension_loaded(&self, name: &str) -> bool;

    /// Raw server-info string reported by the database driver
    /// (e.g. `5.7.32-log`).
    fn mysql_server_info(&self) -> String;

    /// Database server version: the server-info string up to the first `-`.
    fn mysql_version(&self) -> String {
        parse_server_info(&self.mysql_server_info()).to_string()
    }

    /// WordPress core version.
    fn core_version(&self) -> String;

    /// Whether a plugin (by basename) is active.
    fn is_plugin_active(&self, slug: &str) -> bool;

    /// Installed version of a plugin, if known.
    fn plugin_version(&self, slug: &str) -> Option<String>;

    /// Whether the plugin's file exists in the plugins directory.
    fn plugin_exists(&self, slug: &str) -> bool;

    /// Template (parent theme) slug of the current theme.
    fn current_theme_template_slug(&self) -> Option<String>;

    /// Stylesheet (active theme) slug of the current theme.
    fn current_theme_stylesheet_slug(&self) -> Option<String>;

    /// Version of the current theme.
    fn current_theme_version(&self) -> Option<String>;

    /// Display name of a plugin, for notices.
    fn plugin_name(&self, _slug: &str) -> Option<String> {
        None
    }

    /// Display name of the current theme, for notices.
    fn current_theme_name(&self) -> Option<String> {
        None
    }
}

/// Extract the server version from a driver server-info string.
///
/// Vendor suffixes after the first `-` are dropped, so `5.7.32-log` becomes
/// `5.7.32` and `10.4.12-MariaDB-1:10.4.12+maria~bionic` becomes `10.4.12`.
/// A string without `-` is returned unchanged.
pub fn parse_server_info(server_info: &str) -> &str {
    match server_info.split_once('-') {
        Some((version, _)) => version,
        None => server_info,
    }
}
