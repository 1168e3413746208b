//! WordPress file header parsing.
//!
//! Plugins and themes describe themselves in a comment block at the top of
//! their main file (`Plugin Name: Foo`, `Version: 1.2.0`). Core records its
//! version in `wp-includes/version.php`. These readers let a probe fill in
//! details an environment snapshot leaves out.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Only the start of a file is scanned for headers.
const HEADER_SCAN_BYTES: u64 = 8 * 1024;

static CORE_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$wp_version\s*=\s*['"]([^'"]+)['"]"#).expect("CORE_VERSION_REGEX must compile")
});

/// One `Field Name: value` line of a header comment block.
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t/*#@]*([A-Za-z][A-Za-z ]*?)[ \t]*:(.*)$")
        .expect("HEADER_REGEX must compile")
});

/// Headers read from a plugin main file or a theme stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeaders {
    /// `Plugin Name:` or `Theme Name:`
    pub name: Option<String>,
    /// `Version:`
    pub version: Option<String>,
}

/// Find the value of one header field in file content. Field names match
/// case-insensitively; the first line naming the field wins.
pub fn header_value(content: &str, field: &str) -> Option<String> {
    let raw = HEADER_REGEX
        .captures_iter(content)
        .find(|caps| caps[1].eq_ignore_ascii_case(field))?
        .get(2)?
        .as_str();

    let value = raw
        .trim()
        .trim_end_matches("?>")
        .trim_end_matches("*/")
        .trim();

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn read_head(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut buf = Vec::new();
    file.take(HEADER_SCAN_BYTES).read_to_end(&mut buf).ok()?;
    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// Read `Plugin Name:` and `Version:` from a plugin main file.
pub fn read_plugin_headers(path: &Path) -> Option<FileHeaders> {
    let content = read_head(path)?;
    Some(FileHeaders {
        name: header_value(&content, "Plugin Name"),
        version: header_value(&content, "Version"),
    })
}

/// Read `Theme Name:` and `Version:` from a theme's `style.css`.
pub fn read_theme_headers(theme_dir: &Path) -> Option<FileHeaders> {
    let content = read_head(&theme_dir.join("style.css"))?;
    Some(FileHeaders {
        name: header_value(&content, "Theme Name"),
        version: header_value(&content, "Version"),
    })
}

/// Read the core version from `<root>/wp-includes/version.php`.
pub fn read_core_version(wp_root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(wp_root.join("wp-includes").join("version.php")).ok()?;
    CORE_VERSION_REGEX
        .captures(&content)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PLUGIN_FILE: &str = r#"<?php
/**
 * Plugin Name: Foo Commerce
 * Description: Sells foo.
 * Version:     2.1.0
 * Author:      Foo Inc.
 */
"#;

    #[test]
    fn reads_docblock_headers() {
        assert_eq!(header_value(PLUGIN_FILE, "Plugin Name").as_deref(), Some("Foo Commerce"));
        assert_eq!(header_value(PLUGIN_FILE, "Version").as_deref(), Some("2.1.0"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        assert_eq!(header_value(PLUGIN_FILE, "plugin name").as_deref(), Some("Foo Commerce"));
    }

    #[test]
    fn first_matching_field_wins() {
        let content = " * Version: 1.0\n * Version: 2.0\n";
        assert_eq!(header_value(content, "Version").as_deref(), Some("1.0"));
    }

    #[test]
    fn similar_field_names_do_not_match() {
        let content = " * Requires PHP: 7.4\n * Stable Version: 3.0\n";
        assert!(header_value(content, "Version").is_none());
        assert_eq!(header_value(content, "Requires PHP").as_deref(), Some("7.4"));
    }

    #[test]
    fn missing_header_is_none() {
        assert!(header_value(PLUGIN_FILE, "Text Domain").is_none());
    }

    #[test]
    fn strips_closing_comment() {
        let content = "/* Theme Name: Tiny */";
        assert_eq!(header_value(content, "Theme Name").as_deref(), Some("Tiny"));
    }

    #[test]
    fn empty_header_is_none() {
        assert!(header_value(" * Version:   \n", "Version").is_none());
    }

    #[test]
    fn reads_plugin_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foo.php");
        fs::write(&path, PLUGIN_FILE).unwrap();

        let headers = read_plugin_headers(&path).unwrap();
        assert_eq!(headers.name.as_deref(), Some("Foo Commerce"));
        assert_eq!(headers.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn missing_plugin_file_is_none() {
        assert!(read_plugin_headers(Path::new("/nonexistent/foo.php")).is_none());
    }

    #[test]
    fn reads_theme_stylesheet() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("style.css"),
            "/*\nTheme Name: Parent Theme\nVersion: 1.2\n*/\n",
        )
        .unwrap();

        let headers = read_theme_headers(temp.path()).unwrap();
        assert_eq!(headers.name.as_deref(), Some("Parent Theme"));
        assert_eq!(headers.version.as_deref(), Some("1.2"));
    }

    #[test]
    fn reads_core_version_file() {
        let temp = TempDir::new().unwrap();
        let includes = temp.path().join("wp-includes");
        fs::create_dir_all(&includes).unwrap();
        fs::write(
            includes.join("version.php"),
            "<?php\n/**\n * The WordPress version string.\n */\n$wp_version = '6.4.2';\n",
        )
        .unwrap();

        assert_eq!(read_core_version(temp.path()).as_deref(), Some("6.4.2"));
    }

    #[test]
    fn missing_core_version_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(read_core_version(temp.path()).is_none());
    }
}
