//! Validation result types.
//!
//! A [`ResultTree`] mirrors the shape of the requirement spec with a
//! boolean at every leaf. A [`RequiredTree`] records the required value
//! behind each leaf so messages can say what was expected.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::schema::{MysqlRequirement, PhpRequirement, WordpressRequirement};

/// Top-level section of a requirement spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Php,
    Mysql,
    Wordpress,
}

impl Section {
    /// Key of this section in a requirements document.
    pub fn key(self) -> &'static str {
        match self {
            Section::Php => "php",
            Section::Mysql => "mysql",
            Section::Wordpress => "wordpress",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Section::Php => "PHP",
            Section::Mysql => "MySQL",
            Section::Wordpress => "WordPress",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a single leaf checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check<'a> {
    /// The section's version requirement.
    Version,
    /// A PHP extension is loaded.
    Extension(&'a str),
    /// A plugin is installed, active and, if a version is required, new enough.
    Plugin(&'a str),
    /// A theme is current and, if a version is required, new enough.
    Theme(&'a str),
}

/// One boolean outcome in a result tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<'a> {
    /// Section the leaf belongs to.
    pub section: Section,
    /// What was checked.
    pub check: Check<'a>,
    /// Whether the requirement is met.
    pub satisfied: bool,
}

/// Results of the PHP section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhpResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, bool>,
}

/// Results of the MySQL section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MysqlResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,
}

/// Results of the WordPress section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordpressResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub plugins: IndexMap<String, bool>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub theme: IndexMap<String, bool>,
}

/// Outcome of one validation run, shaped like the requirements.
///
/// # Example
///
/// ```
/// use wp_requirements::requirements::status::{PhpResults, ResultTree};
///
/// let mut tree = ResultTree::default();
/// assert!(tree.is_valid());
///
/// tree.php = Some(PhpResults { version: Some(false), ..Default::default() });
/// assert!(!tree.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php: Option<PhpResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql: Option<MysqlResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress: Option<WordpressResults>,
}

impl ResultTree {
    /// Whether no section was checked.
    pub fn is_empty(&self) -> bool {
        self.php.is_none() && self.mysql.is_none() && self.wordpress.is_none()
    }

    /// Every leaf, section by section.
    pub fn leaves(&self) -> Vec<Leaf<'_>> {
        let mut leaves = Vec::new();

        if let Some(php) = &self.php {
            push_version(&mut leaves, Section::Php, php.version);
            for (name, ok) in &php.extensions {
                leaves.push(Leaf {
                    section: Section::Php,
                    check: Check::Extension(name),
                    satisfied: *ok,
                });
            }
        }

        if let Some(mysql) = &self.mysql {
            push_version(&mut leaves, Section::Mysql, mysql.version);
        }

        if let Some(wp) = &self.wordpress {
            push_version(&mut leaves, Section::Wordpress, wp.version);
            for (slug, ok) in &wp.plugins {
                leaves.push(Leaf {
                    section: Section::Wordpress,
                    check: Check::Plugin(slug),
                    satisfied: *ok,
                });
            }
            for (slug, ok) in &wp.theme {
                leaves.push(Leaf {
                    section: Section::Wordpress,
                    check: Check::Theme(slug),
                    satisfied: *ok,
                });
            }
        }

        leaves
    }

    /// Leaves that are not satisfied.
    pub fn failures(&self) -> Vec<Leaf<'_>> {
        self.leaves().into_iter().filter(|l| !l.satisfied).collect()
    }

    /// Whether no leaf anywhere in the tree is `false`.
    ///
    /// An empty tree is valid: nothing was required.
    pub fn is_valid(&self) -> bool {
        self.leaves().iter().all(|l| l.satisfied)
    }
}

fn push_version(leaves: &mut Vec<Leaf<'_>>, section: Section, version: Option<bool>) {
    if let Some(ok) = version {
        leaves.push(Leaf {
            section,
            check: Check::Version,
            satisfied: ok,
        });
    }
}

/// Required values behind each result leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequiredTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php: Option<PhpRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql: Option<MysqlRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress: Option<WordpressRequirement>,
}

impl RequiredTree {
    /// Required version behind a leaf. Extensions have no version, nor do
    /// plugins and themes that accept any version.
    pub fn version_for(&self, section: Section, check: Check<'_>) -> Option<&str> {
        match (section, check) {
            (Section::Php, Check::Version) => self.php.as_ref()?.version.as_deref(),
            (Section::Mysql, Check::Version) => self.mysql.as_ref()?.version.as_deref(),
            (Section::Wordpress, Check::Version) => self.wordpress.as_ref()?.version.as_deref(),
            (Section::Wordpress, Check::Plugin(slug)) => {
                self.wordpress.as_ref()?.plugins.get(slug)?.as_deref()
            }
            (Section::Wordpress, Check::Theme(slug)) => {
                self.wordpress.as_ref()?.theme.get(slug)?.as_deref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(php_version: Option<bool>, plugins: &[(&str, bool)]) -> ResultTree {
        ResultTree {
            php: Some(PhpResults {
                version: php_version,
                extensions: IndexMap::new(),
            }),
            mysql: None,
            wordpress: Some(WordpressResults {
                version: None,
                plugins: plugins
                    .iter()
                    .map(|(slug, ok)| (slug.to_string(), *ok))
                    .collect(),
                theme: IndexMap::new(),
            }),
        }
    }

    #[test]
    fn empty_tree_is_valid() {
        let tree = ResultTree::default();
        assert!(tree.is_empty());
        assert!(tree.is_valid());
        assert!(tree.leaves().is_empty());
    }

    #[test]
    fn sections_without_leaves_are_valid() {
        let tree = tree(None, &[]);
        assert!(!tree.is_empty());
        assert!(tree.is_valid());
    }

    #[test]
    fn all_true_is_valid() {
        assert!(tree(Some(true), &[("a/a.php", true), ("b/b.php", true)]).is_valid());
    }

    #[test]
    fn any_false_leaf_is_invalid() {
        assert!(!tree(Some(false), &[("a/a.php", true)]).is_valid());
        assert!(!tree(Some(true), &[("a/a.php", true), ("b/b.php", false)]).is_valid());
    }

    #[test]
    fn false_leaf_at_every_position_is_found() {
        let mut base = ResultTree {
            php: Some(PhpResults {
                version: Some(true),
                extensions: [("curl".to_string(), true)].into_iter().collect(),
            }),
            mysql: Some(MysqlResults { version: Some(true) }),
            wordpress: Some(WordpressResults {
                version: Some(true),
                plugins: [("a/a.php".to_string(), true)].into_iter().collect(),
                theme: [("t".to_string(), true)].into_iter().collect(),
            }),
        };
        assert!(base.is_valid());
        let total = base.leaves().len();
        assert_eq!(total, 6);

        for position in 0..total {
            let mut flipped = base.clone();
            set_leaf(&mut flipped, position, false);
            assert!(!flipped.is_valid(), "leaf {} not detected", position);
            assert_eq!(flipped.failures().len(), 1);
        }

        set_leaf(&mut base, 0, true);
        assert!(base.is_valid());
    }

    fn set_leaf(tree: &mut ResultTree, position: usize, value: bool) {
        let php = tree.php.as_mut().unwrap();
        let mysql = tree.mysql.as_mut().unwrap();
        let wp = tree.wordpress.as_mut().unwrap();
        match position {
            0 => php.version = Some(value),
            1 => *php.extensions.get_mut("curl").unwrap() = value,
            2 => mysql.version = Some(value),
            3 => wp.version = Some(value),
            4 => *wp.plugins.get_mut("a/a.php").unwrap() = value,
            5 => *wp.theme.get_mut("t").unwrap() = value,
            _ => unreachable!(),
        }
    }

    #[test]
    fn plugin_leaves_keep_insertion_order() {
        let status = tree(None, &[("z/z.php", true), ("a/a.php", false)]);
        let slugs: Vec<_> = status
            .leaves()
            .into_iter()
            .map(|leaf| leaf.check)
            .collect();
        assert_eq!(slugs, vec![Check::Plugin("z/z.php"), Check::Plugin("a/a.php")]);
    }

    #[test]
    fn leaves_are_listed_section_by_section() {
        let status = tree(Some(true), &[("a/a.php", false)]);
        let leaves = status.leaves();
        assert_eq!(leaves[0].section, Section::Php);
        assert_eq!(leaves[0].check, Check::Version);
        assert_eq!(leaves[1].section, Section::Wordpress);
        assert_eq!(leaves[1].check, Check::Plugin("a/a.php"));
        assert!(!leaves[1].satisfied);
    }

    #[test]
    fn serializes_without_empty_parts() {
        let json = serde_json::to_value(tree(Some(false), &[("foo/foo.php", false)])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "php": {"version": false},
                "wordpress": {"plugins": {"foo/foo.php": false}}
            })
        );
        assert_eq!(serde_json::to_value(ResultTree::default()).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn required_tree_looks_up_versions() {
        let required = RequiredTree {
            php: Some(PhpRequirement {
                version: Some("7.4".into()),
                extensions: vec!["curl".into()],
            }),
            mysql: None,
            wordpress: Some(WordpressRequirement {
                version: None,
                plugins: [
                    ("foo/foo.php".to_string(), Some("2.0".to_string())),
                    ("bar/bar.php".to_string(), None),
                ]
                .into_iter()
                .collect(),
                theme: IndexMap::new(),
            }),
        };

        assert_eq!(required.version_for(Section::Php, Check::Version), Some("7.4"));
        assert_eq!(
            required.version_for(Section::Wordpress, Check::Plugin("foo/foo.php")),
            Some("2.0")
        );
        assert_eq!(
            required.version_for(Section::Wordpress, Check::Plugin("bar/bar.php")),
            None
        );
        assert_eq!(required.version_for(Section::Php, Check::Extension("curl")), None);
        assert_eq!(required.version_for(Section::Mysql, Check::Version), None);
    }

    #[test]
    fn section_names() {
        assert_eq!(Section::Wordpress.key(), "wordpress");
        assert_eq!(Section::Mysql.to_string(), "MySQL");
    }
}
