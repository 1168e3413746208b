//! Failure reaction.
//!
//! When requirements are not met, the [`FailureReactor`] drives the host
//! through the configured actions in order: deactivate the plugin and/or
//! register an admin notice. The host itself sits behind [`HostActions`].
//!
//! # Example
//!
//! ```
//! use wp_requirements::reactor::{HostActions, RecordingHost};
//!
//! let mut host = RecordingHost::with_active(["foo/foo.php"]);
//! host.deactivate_plugin("foo/foo.php");
//! host.deactivate_plugin("foo/foo.php");
//! assert!(!host.is_active("foo/foo.php"));
//! ```

pub mod notice;

use std::collections::BTreeSet;

use crate::config::params::{Config, NotValidAction};
use crate::plugin::PluginIdentity;
use crate::requirements::checker::Validation;
use crate::requirements::probe::EnvironmentProbe;

pub use notice::{escape_html, AdminNotice, Translator, Untranslated};

/// Side effects the reactor asks of the host platform.
pub trait HostActions {
    /// Deactivate a plugin by basename. Deactivating an inactive plugin
    /// is a no-op.
    fn deactivate_plugin(&mut self, basename: &str);

    /// Register a notice to be rendered in the host's notice phase.
    fn register_admin_notice(&mut self, notice: AdminNotice);

    /// Clear the "just activated" signal so the host does not report a
    /// successful activation.
    fn clear_activation_flag(&mut self);
}

/// Runs the configured failure actions for one plugin.
pub struct FailureReactor<'a> {
    identity: &'a PluginIdentity,
    config: &'a Config,
}

impl<'a> FailureReactor<'a> {
    /// Create a reactor for a plugin and its resolved config.
    pub fn new(identity: &'a PluginIdentity, config: &'a Config) -> Self {
        Self { identity, config }
    }

    /// Run every configured action, in order.
    ///
    /// Does nothing when no section was checked or no action is configured.
    pub fn react(
        &self,
        validation: &Validation,
        probe: &dyn EnvironmentProbe,
        host: &mut dyn HostActions,
    ) {
        if validation.results.is_empty() || self.config.not_valid_actions.is_empty() {
            tracing::debug!("No failure actions to run");
            return;
        }

        for action in &self.config.not_valid_actions {
            match action {
                NotValidAction::Deactivate => {
                    tracing::info!("Deactivating {}", self.identity.basename);
                    host.deactivate_plugin(&self.identity.basename);
                    host.clear_activation_flag();
                }
                NotValidAction::AdminNotice => {
                    tracing::info!("Registering requirements notice for {}", self.identity.name);
                    let notice =
                        AdminNotice::build(&self.identity.name, validation, self.config, probe);
                    host.register_admin_notice(notice);
                }
            }
        }
    }
}

/// In-memory host that records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    active: BTreeSet<String>,
    activation_flag: bool,
    deactivated: Vec<String>,
    notices: Vec<AdminNotice>,
}

impl RecordingHost {
    /// Create a host with the given plugins active and the activation flag set.
    pub fn with_active<I, S>(plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: plugins.into_iter().map(Into::into).collect(),
            activation_flag: true,
            ..Default::default()
        }
    }

    /// Whether a plugin is currently active.
    pub fn is_active(&self, basename: &str) -> bool {
        self.active.contains(basename)
    }

    /// Plugins that are currently active.
    pub fn active_plugins(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Whether the "just activated" signal is still pending.
    pub fn activation_flag(&self) -> bool {
        self.activation_flag
    }

    /// Plugins actually deactivated, in order.
    pub fn deactivated(&self) -> &[String] {
        &self.deactivated
    }

    /// Registered notices.
    pub fn notices(&self) -> &[AdminNotice] {
        &self.notices
    }

    /// Run the notice phase.
    pub fn render_notices(&self) -> String {
        self.render_notices_with(&Untranslated)
    }

    /// Run the notice phase with a translator.
    pub fn render_notices_with(&self, translator: &dyn Translator) -> String {
        self.notices
            .iter()
            .map(|n| n.render_with(translator))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HostActions for RecordingHost {
    fn deactivate_plugin(&mut self, basename: &str) {
        if self.active.remove(basename) {
            self.deactivated.push(basename.to_string());
        }
    }

    fn register_admin_notice(&mut self, notice: AdminNotice) {
        self.notices.push(notice);
    }

    fn clear_activation_flag(&mut self) {
        self.activation_flag = false;
    }
}
