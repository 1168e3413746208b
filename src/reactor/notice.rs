//! Admin notice construction and HTML rendering.
//!
//! An [`AdminNotice`] captures everything it needs to render at the moment
//! it is built: current versions, display names and the resolved config.
//! Rendering happens later, when the host runs its notice phase.

use crate::config::params::Config;
use crate::requirements::checker::{Validation, CORE_COMPARE_OPERATOR};
use crate::requirements::probe::EnvironmentProbe;
use crate::requirements::status::Section;
use crate::version::CompareOperator;

const HEADLINE: &str =
    "{plugin} will not function because your site doesn't meet some of the requirements:";
const DETAILS: &str = "Please read more details {link}here{end}.";
const VERSION_LINE: &str = "{label} Version: current {current}, required {op}{required}";
const EXTENSION_ON: &str = "PHP Extension \"{name}\" is activated";
const EXTENSION_OFF: &str = "PHP Extension \"{name}\" is not activated";
const PLUGIN_ON: &str = "Plugin \"{name}\" is activated and has a required version {op}{required}";
const PLUGIN_OFF: &str = "Plugin \"{name}\" version {op}{required} must be activated";
const THEME_ON: &str = "Theme \"{name}\" is activated and has a required version {op}{required}";
const THEME_OFF: &str = "Theme \"{name}\" version {op}{required} must be activated";
const PLUGIN_ANY_ON: &str = "Plugin \"{name}\" is activated";
const PLUGIN_ANY_OFF: &str = "Plugin \"{name}\" must be activated";
const THEME_ANY_ON: &str = "Theme \"{name}\" is activated";
const THEME_ANY_OFF: &str = "Theme \"{name}\" must be activated";

/// Translates user-facing notice text.
pub trait Translator {
    /// Translate `text` in the given text domain.
    fn translate(&self, text: &str, domain: &str) -> String;
}

/// Returns text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, text: &str, _domain: &str) -> String {
        text.to_string()
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// What one notice line reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeSubject {
    /// A section version compared against its requirement.
    Version {
        section: Section,
        current: String,
        operator: CompareOperator,
        required: String,
    },
    /// A PHP extension.
    Extension { name: String },
    /// A plugin, by display name. `None` accepts any version.
    Plugin {
        name: String,
        operator: CompareOperator,
        required: Option<String>,
    },
    /// A theme, by display name. `None` accepts any version.
    Theme {
        name: String,
        operator: CompareOperator,
        required: Option<String>,
    },
}

/// One list item of a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    pub subject: NoticeSubject,
    pub satisfied: bool,
}

impl NoticeItem {
    fn text(&self, translator: &dyn Translator, domain: &str) -> String {
        let t = |template: &str| translator.translate(template, domain);
        match &self.subject {
            NoticeSubject::Version {
                section,
                current,
                operator,
                required,
            } => fill(
                &t(VERSION_LINE),
                &[
                    ("label", section.label()),
                    ("current", current.as_str()),
                    ("op", operator.symbol()),
                    ("required", required.as_str()),
                ],
            ),
            NoticeSubject::Extension { name } => {
                let template = if self.satisfied { EXTENSION_ON } else { EXTENSION_OFF };
                fill(&t(template), &[("name", name.as_str())])
            }
            NoticeSubject::Plugin {
                name,
                operator,
                required,
            } => {
                let templates = if required.is_some() {
                    (PLUGIN_ON, PLUGIN_OFF)
                } else {
                    (PLUGIN_ANY_ON, PLUGIN_ANY_OFF)
                };
                self.dependency_text(&t, templates, name, *operator, required.as_deref())
            }
            NoticeSubject::Theme {
                name,
                operator,
                required,
            } => {
                let templates = if required.is_some() {
                    (THEME_ON, THEME_OFF)
                } else {
                    (THEME_ANY_ON, THEME_ANY_OFF)
                };
                self.dependency_text(&t, templates, name, *operator, required.as_deref())
            }
        }
    }

    fn dependency_text(
        &self,
        t: &dyn Fn(&str) -> String,
        (on, off): (&str, &str),
        name: &str,
        operator: CompareOperator,
        required: Option<&str>,
    ) -> String {
        let template = if self.satisfied { on } else { off };
        fill(
            &t(template),
            &[
                ("name", name),
                ("op", operator.symbol()),
                ("required", required.unwrap_or_default()),
            ],
        )
    }
}

/// Substitute `{key}` placeholders with HTML-escaped values.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values
            .iter()
            .find(|(key, _)| tail[1..].starts_with(key) && tail[1 + key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(&escape_html(value));
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// A rendered-on-demand admin notice about unmet requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotice {
    /// Display name of the plugin whose requirements failed.
    pub plugin_name: String,
    /// Text domain for translation.
    pub locale: String,
    /// Link shown instead of the item list, when set.
    pub details_url: Option<String>,
    /// Whether satisfied items are listed too.
    pub show_valid_results: bool,
    /// Every checked item, in section order.
    pub items: Vec<NoticeItem>,
}

impl AdminNotice {
    /// Capture a notice from a validation run.
    pub fn build(
        plugin_name: &str,
        validation: &Validation,
        config: &Config,
        probe: &dyn EnvironmentProbe,
    ) -> Self {
        let mut items = Vec::new();
        let results = &validation.results;
        let required = &validation.required;
        let op = config.compare_operator;

        if let (Some(php), Some(req)) = (&results.php, &required.php) {
            if let (Some(ok), Some(version)) = (php.version, &req.version) {
                items.push(version_item(Section::Php, probe.php_version(), op, version, ok));
            }
            let mut seen = Vec::new();
            for name in &req.extensions {
                if seen.contains(&name) {
                    continue;
                }
                seen.push(name);
                if let Some(ok) = php.extensions.get(name) {
                    items.push(NoticeItem {
                        subject: NoticeSubject::Extension { name: name.clone() },
                        satisfied: *ok,
                    });
                }
            }
        }

        if let (Some(mysql), Some(req)) = (&results.mysql, &required.mysql) {
            if let (Some(ok), Some(version)) = (mysql.version, &req.version) {
                items.push(version_item(Section::Mysql, probe.mysql_version(), op, version, ok));
            }
        }

        if let (Some(wp), Some(req)) = (&results.wordpress, &required.wordpress) {
            if let (Some(ok), Some(version)) = (wp.version, &req.version) {
                items.push(version_item(
                    Section::Wordpress,
                    probe.core_version(),
                    CORE_COMPARE_OPERATOR,
                    version,
                    ok,
                ));
            }
            for (slug, ok) in &wp.plugins {
                let Some(version) = req.plugins.get(slug) else {
                    continue;
                };
                items.push(NoticeItem {
                    subject: NoticeSubject::Plugin {
                        name: probe.plugin_name(slug).unwrap_or_else(|| slug.clone()),
                        operator: op,
                        required: version.clone(),
                    },
                    satisfied: *ok,
                });
            }
            let stylesheet = probe.current_theme_stylesheet_slug();
            for (slug, ok) in &wp.theme {
                let Some(version) = req.theme.get(slug) else {
                    continue;
                };
                let name = if stylesheet.as_deref() == Some(slug.as_str()) {
                    probe.current_theme_name()
                } else {
                    None
                };
                items.push(NoticeItem {
                    subject: NoticeSubject::Theme {
                        name: name.unwrap_or_else(|| slug.clone()),
                        operator: op,
                        required: version.clone(),
                    },
                    satisfied: *ok,
                });
            }
        }

        Self {
            plugin_name: plugin_name.to_string(),
            locale: config.locale.clone(),
            details_url: config.details_url.clone(),
            show_valid_results: config.show_valid_results,
            items,
        }
    }

    /// Items that the rendered list shows.
    pub fn visible_items(&self) -> impl Iterator<Item = &NoticeItem> {
        self.items
            .iter()
            .filter(|item| self.show_valid_results || !item.satisfied)
    }

    /// Render the notice without translation.
    pub fn render(&self) -> String {
        self.render_with(&Untranslated)
    }

    /// Render the notice through a translator.
    pub fn render_with(&self, translator: &dyn Translator) -> String {
        let domain = self.locale.as_str();
        let mut html = String::from("<div class=\"notice is-dismissible error\">");

        html.push_str("<p>");
        html.push_str(&translator.translate(HEADLINE, domain).replace(
            "{plugin}",
            &format!("<strong>{}</strong>", escape_html(&self.plugin_name)),
        ));
        html.push_str("</p>");

        if let Some(url) = &self.details_url {
            let details = translator
                .translate(DETAILS, domain)
                .replace("{link}", &format!("<a href=\"{}\">", escape_html(url)))
                .replace("{end}", "</a>");
            html.push_str("<p>");
            html.push_str(&details);
            html.push_str("</p>");
        } else {
            html.push_str("<ul>");
            for item in self.visible_items() {
                let text = item.text(translator, domain);
                if text.trim().is_empty() {
                    continue;
                }
                let icon = if item.satisfied { "dashicons-yes" } else { "dashicons-minus" };
                html.push_str(&format!(
                    "<li><span class=\"dashicons {}\"></span> {}</li>",
                    icon, text
                ));
            }
            html.push_str("</ul>");
        }

        html.push_str("</div>");
        html
    }
}

fn version_item(
    section: Section,
    current: String,
    operator: CompareOperator,
    required: &str,
    satisfied: bool,
) -> NoticeItem {
    NoticeItem {
        subject: NoticeSubject::Version {
            section,
            current,
            operator,
            required: required.to_string(),
        },
        satisfied,
    }
}
