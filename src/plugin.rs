//! Host plugin identity and WordPress directory layout.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::requirements::headers::read_plugin_headers;

/// Directory layout of a WordPress installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    /// Installation root (where `wp-config.php` lives).
    pub install_root: PathBuf,
    /// Shared content directory.
    pub content_dir: PathBuf,
    /// Plugins directory.
    pub plugins_dir: PathBuf,
}

impl HostLayout {
    /// Standard layout under an installation root.
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        let install_root = install_root.into();
        let content_dir = install_root.join("wp-content");
        let plugins_dir = content_dir.join("plugins");
        Self {
            install_root,
            content_dir,
            plugins_dir,
        }
    }

    /// Override the content directory. The plugins directory follows it.
    pub fn with_content_dir(mut self, content_dir: impl Into<PathBuf>) -> Self {
        self.content_dir = content_dir.into();
        self.plugins_dir = self.content_dir.join("plugins");
        self
    }

    /// Override the plugins directory.
    pub fn with_plugins_dir(mut self, plugins_dir: impl Into<PathBuf>) -> Self {
        self.plugins_dir = plugins_dir.into();
        self
    }
}

/// Metadata of the plugin whose requirements are being checked.
///
/// Resolved once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginIdentity {
    /// Plugin directory name.
    pub dirname: String,
    /// Main file name.
    pub filename: String,
    /// `dirname/filename`, the key the host uses for activation state.
    pub basename: String,
    /// Absolute path to the main file.
    pub fullpath: PathBuf,
    /// Display name.
    pub name: String,
}

impl PluginIdentity {
    /// Resolve identity from a plugin main file.
    ///
    /// The basename is the path relative to the plugins directory; a file
    /// outside it falls back to `<parent dir>/<file>`. A single-file plugin
    /// has an empty dirname. The name comes from the `Plugin Name:` header,
    /// or the directory name (file name for single-file plugins).
    pub fn resolve(plugin_file: &Path, layout: &HostLayout) -> Self {
        let basename = plugin_file
            .strip_prefix(&layout.plugins_dir)
            .ok()
            .map(normalize)
            .unwrap_or_else(|| fallback_basename(plugin_file));

        let (dirname, filename) = match basename.split_once('/') {
            Some((dir, file)) => (dir.to_string(), file.to_string()),
            None => (String::new(), basename.clone()),
        };

        let name = read_plugin_headers(plugin_file)
            .and_then(|headers| headers.name)
            .unwrap_or_else(|| {
                tracing::debug!(
                    "No Plugin Name header in {}; using directory name",
                    plugin_file.display()
                );
                if dirname.is_empty() {
                    filename.clone()
                } else {
                    dirname.clone()
                }
            });

        Self {
            dirname,
            filename,
            basename,
            fullpath: plugin_file.to_path_buf(),
            name,
        }
    }

    /// Directory containing the main file.
    pub fn root_dir(&self) -> &Path {
        self.fullpath.parent().unwrap_or_else(|| Path::new(""))
    }
}

fn normalize(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn fallback_basename(plugin_file: &Path) -> String {
    let file = plugin_file
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = plugin_file
        .parent()
        .and_then(Path::file_name)
        .map(|d| d.to_string_lossy().into_owned());

    match dir {
        Some(dir) => format!("{}/{}", dir, file),
        None => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_plugin(layout: &HostLayout, basename: &str, header: &str) -> PathBuf {
        let path = layout.plugins_dir.join(basename);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, header).unwrap();
        path
    }

    #[test]
    fn layout_defaults_follow_install_root() {
        let layout = HostLayout::new("/var/www");
        assert_eq!(layout.content_dir, PathBuf::from("/var/www/wp-content"));
        assert_eq!(layout.plugins_dir, PathBuf::from("/var/www/wp-content/plugins"));
    }

    #[test]
    fn plugins_dir_follows_content_dir() {
        let layout = HostLayout::new("/var/www").with_content_dir("/srv/content");
        assert_eq!(layout.plugins_dir, PathBuf::from("/srv/content/plugins"));
    }

    #[test]
    fn resolves_identity_inside_plugins_dir() {
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path());
        let path = write_plugin(&layout, "my-plugin/my-plugin.php", "<?php\n/* Plugin Name: My Plugin */\n");

        let identity = PluginIdentity::resolve(&path, &layout);
        assert_eq!(identity.basename, "my-plugin/my-plugin.php");
        assert_eq!(identity.dirname, "my-plugin");
        assert_eq!(identity.filename, "my-plugin.php");
        assert_eq!(identity.name, "My Plugin");
        assert_eq!(identity.root_dir(), layout.plugins_dir.join("my-plugin"));
    }

    #[test]
    fn name_falls_back_to_dirname() {
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path());
        let path = write_plugin(&layout, "bare/bare.php", "<?php\n");

        let identity = PluginIdentity::resolve(&path, &layout);
        assert_eq!(identity.name, "bare");
    }

    #[test]
    fn single_file_plugin_has_no_dirname() {
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path());
        let path = write_plugin(&layout, "hello.php", "<?php\n/* Plugin Name: Hello Dolly */\n");

        let identity = PluginIdentity::resolve(&path, &layout);
        assert_eq!(identity.basename, "hello.php");
        assert_eq!(identity.dirname, "");
        assert_eq!(identity.name, "Hello Dolly");
    }

    #[test]
    fn file_outside_plugins_dir_uses_parent_name() {
        let temp = TempDir::new().unwrap();
        let layout = HostLayout::new(temp.path().join("wordpress"));
        let dir = temp.path().join("checkout").join("shop");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("shop.php");
        fs::write(&path, "<?php\n").unwrap();

        let identity = PluginIdentity::resolve(&path, &layout);
        assert_eq!(identity.basename, "shop/shop.php");
    }
}
