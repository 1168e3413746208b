//! File-backed environment probe.
//!
//! An [`EnvironmentSnapshot`] is a JSON description of a WordPress host:
//!
//! ```json
//! {
//!   "php": { "version": "8.1.2", "extensions": ["curl", "mbstring"] },
//!   "mysql": { "server_info": "5.7.32-log" },
//!   "wordpress": {
//!     "version": "6.4.2",
//!     "plugins": {
//!       "woocommerce/woocommerce.php": { "version": "8.2.1", "active": true }
//!     },
//!     "theme": { "template": "storefront", "stylesheet": "storefront-child", "version": "4.5.0" }
//!   }
//! }
//! ```
//!
//! Attached to a WordPress install on disk, the snapshot fills gaps from the
//! install itself: plugin existence, plugin versions and names from file
//! headers, theme details from `style.css`, and the core version from
//! `wp-includes/version.php`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RequirementsError, Result};
use crate::requirements::headers::{
    read_core_version, read_plugin_headers, read_theme_headers, FileHeaders,
};
use crate::requirements::probe::EnvironmentProbe;

/// Recorded PHP runtime facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpSnapshot {
    /// PHP version
    pub version: String,
    /// Loaded extensions
    pub extensions: Vec<String>,
}

/// Recorded database facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysqlSnapshot {
    /// Driver server-info string, vendor suffix included
    pub server_info: String,
}

/// Recorded facts about one installed plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSnapshot {
    /// Installed version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether the plugin is active
    pub active: bool,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Recorded facts about the current theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSnapshot {
    /// Parent theme slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Active theme slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
    /// Theme version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Recorded WordPress facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordpressSnapshot {
    /// Core version
    pub version: String,
    /// Installed plugins by basename
    pub plugins: BTreeMap<String, PluginSnapshot>,
    /// Current theme
    pub theme: ThemeSnapshot,
}

/// A recorded description of a host, usable as an [`EnvironmentProbe`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSnapshot {
    /// PHP runtime
    pub php: PhpSnapshot,
    /// Database server
    pub mysql: MysqlSnapshot,
    /// WordPress core, plugins and theme
    pub wordpress: WordpressSnapshot,

    /// Plugins directory to consult for existence and headers
    #[serde(skip)]
    plugins_dir: Option<PathBuf>,
}

impl EnvironmentSnapshot {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentNotFound` if the file doesn't exist.
    /// Returns `EnvironmentParseError` if the JSON is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RequirementsError::EnvironmentNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RequirementsError::Io(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse snapshot JSON.
    ///
    /// * `content` - The JSON content to parse
    /// * `source_path` - Path for error reporting
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| RequirementsError::EnvironmentParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Decide plugin existence on disk and fill missing plugin details from
    /// file headers in `plugins_dir`.
    pub fn with_plugins_dir(mut self, plugins_dir: impl Into<PathBuf>) -> Self {
        self.plugins_dir = Some(plugins_dir.into());
        self
    }

    /// Fill a missing core version from the install at `wp_root`.
    pub fn with_install_root(mut self, wp_root: &Path) -> Self {
        if self.wordpress.version.is_empty() {
            match read_core_version(wp_root) {
                Some(version) => self.wordpress.version = version,
                None => tracing::debug!(
                    "No core version found under {}",
                    wp_root.display()
                ),
            }
        }
        self
    }

    /// Fill missing current-theme version and name from the active theme's
    /// `style.css` in `themes_dir`.
    pub fn with_themes_dir(mut self, themes_dir: &Path) -> Self {
        let theme = &mut self.wordpress.theme;
        if theme.version.is_some() && theme.name.is_some() {
            return self;
        }
        let Some(slug) = theme.stylesheet.as_ref() else {
            return self;
        };
        if let Some(headers) = read_theme_headers(&themes_dir.join(slug)) {
            theme.version = theme.version.take().or(headers.version);
            theme.name = theme.name.take().or(headers.name);
        }
        self
    }

    fn plugin(&self, slug: &str) -> Option<&PluginSnapshot> {
        self.wordpress.plugins.get(slug)
    }

    fn plugin_headers(&self, slug: &str) -> Option<FileHeaders> {
        let dir = self.plugins_dir.as_ref()?;
        read_plugin_headers(&dir.join(slug))
    }
}

impl EnvironmentProbe for EnvironmentSnapshot {
    fn php_version(&self) -> String {
        self.php.version.clone()
    }

    fn is_extension_loaded(&self, name: &str) -> bool {
        self.php
            .extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(name))
    }

    fn mysql_server_info(&self) -> String {
        self.mysql.server_info.clone()
    }

    fn core_version(&self) -> String {
        self.wordpress.version.clone()
    }

    fn is_plugin_active(&self, slug: &str) -> bool {
        self.plugin(slug).is_some_and(|p| p.active)
    }

    fn plugin_version(&self, slug: &str) -> Option<String> {
        self.plugin(slug)
            .and_then(|p| p.version.clone())
            .or_else(|| self.plugin_headers(slug).and_then(|h| h.version))
    }

    fn plugin_exists(&self, slug: &str) -> bool {
        match &self.plugins_dir {
            Some(dir) => dir.join(slug).exists(),
            None => self.plugin(slug).is_some(),
        }
    }

    fn current_theme_template_slug(&self) -> Option<String> {
        self.wordpress.theme.template.clone()
    }

    fn current_theme_stylesheet_slug(&self) -> Option<String> {
        self.wordpress.theme.stylesheet.clone()
    }

    fn current_theme_version(&self) -> Option<String> {
        self.wordpress.theme.version.clone()
    }

    fn plugin_name(&self, slug: &str) -> Option<String> {
        self.plugin(slug)
            .and_then(|p| p.name.clone())
            .or_else(|| self.plugin_headers(slug).and_then(|h| h.name))
    }

    fn current_theme_name(&self) -> Option<String> {
        self.wordpress.theme.name.clone()
    }
}
