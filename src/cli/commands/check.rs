//! Check command implementation.
//!
//! The `wp-requirements check` command validates requirements against an
//! environment snapshot and reports the result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::cli::args::CheckArgs;
use crate::config::loader::{load_requirements_file, RequirementLoader, SearchPaths};
use crate::config::params::Config;
use crate::config::schema::RequirementSpec;
use crate::error::Result;
use crate::plugin::{HostLayout, PluginIdentity};
use crate::reactor::RecordingHost;
use crate::report::{HumanFormatter, JsonFormatter, OutputFormat, ReportFormatter};
use crate::requirements::check::RequirementsCheck;
use crate::requirements::checker::{RequirementChecker, Validation};
use crate::requirements::snapshot::EnvironmentSnapshot;

use super::dispatcher::{Command, CommandResult};

/// Exit code when requirements are not met.
pub const EXIT_NOT_VALID: i32 = 1;

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
    use_color: bool,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs, use_color: bool) -> Self {
        Self { args, use_color }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    fn layout(&self) -> Result<HostLayout> {
        let root = match &self.args.wp_root {
            Some(root) => root.clone(),
            None => working_dir()?,
        };

        let mut layout = HostLayout::new(root);
        if let Some(dir) = &self.args.content_dir {
            layout = layout.with_content_dir(dir);
        }
        if let Some(dir) = &self.args.plugins_dir {
            layout = layout.with_plugins_dir(dir);
        }
        Ok(layout)
    }

    /// Load the snapshot, filling gaps from disk when a site was named.
    fn environment(&self, layout: &HostLayout) -> Result<EnvironmentSnapshot> {
        let mut env = EnvironmentSnapshot::load(&self.args.env)?;

        if self.args.wp_root.is_some() || self.args.content_dir.is_some() {
            env = env
                .with_install_root(&layout.install_root)
                .with_themes_dir(&layout.content_dir.join("themes"));
        }
        if self.args.wp_root.is_some() || self.args.plugins_dir.is_some() {
            env = env.with_plugins_dir(&layout.plugins_dir);
        }
        Ok(env)
    }

    fn explicit_spec(&self) -> Result<Option<RequirementSpec>> {
        self.args
            .requirements
            .as_deref()
            .map(load_requirements_file)
            .transpose()
    }

    fn search_paths(
        &self,
        identity: Option<&PluginIdentity>,
        layout: &HostLayout,
    ) -> Result<SearchPaths> {
        let mut paths = match identity {
            Some(identity) => SearchPaths::discover(identity, layout),
            None => SearchPaths {
                source_dir: None,
                plugin_dir: working_dir()?,
                content_dir: layout.content_dir.clone(),
                install_root: layout.install_root.clone(),
            },
        };
        if let Some(dir) = &self.args.source_dir {
            paths = paths.with_source_dir(dir);
        }
        Ok(paths)
    }

    fn write_report(&self, validation: &Validation, out: &mut dyn Write) -> Result<()> {
        match self.args.format {
            OutputFormat::Human => HumanFormatter::new(self.use_color).format(validation, out)?,
            OutputFormat::Json => JsonFormatter::new().format(validation, out)?,
        }
        Ok(())
    }

    fn write_actions(&self, host: &RecordingHost, out: &mut dyn Write) -> Result<()> {
        if self.args.format != OutputFormat::Human {
            return Ok(());
        }

        writeln!(out)?;
        for basename in host.deactivated() {
            writeln!(out, "Deactivated {}", basename)?;
        }
        if !host.notices().is_empty() {
            writeln!(out, "Registered {} admin notice(s)", host.notices().len())?;
        }
        if host.deactivated().is_empty() && host.notices().is_empty() {
            writeln!(out, "No failure actions configured")?;
        }

        if self.args.notice && !host.notices().is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", host.render_notices())?;
        }
        Ok(())
    }
}

fn working_dir() -> Result<PathBuf> {
    let dir = std::env::current_dir().context("Failed to resolve the working directory")?;
    Ok(dir)
}

impl Command for CheckCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let layout = self.layout()?;
        let env = self.environment(&layout)?;
        let explicit = self.explicit_spec()?;

        let identity = self
            .args
            .plugin_file
            .as_ref()
            .map(|file| PluginIdentity::resolve(file, &layout));
        let loader = RequirementLoader::new(self.search_paths(identity.as_ref(), &layout)?);

        let (validation, host) = match identity {
            Some(identity) => {
                let basename = identity.basename.clone();
                let check = RequirementsCheck::new(identity, explicit, &loader, &env);

                let host = if self.args.apply && !check.valid() {
                    let active = env
                        .wordpress
                        .plugins
                        .iter()
                        .filter(|(_, plugin)| plugin.active)
                        .map(|(slug, _)| slug.clone())
                        .chain(std::iter::once(basename));
                    let mut host = RecordingHost::with_active(active);
                    check.process_failure(&mut host);
                    Some(host)
                } else {
                    None
                };

                (check.validation().clone(), host)
            }
            None => {
                let spec = loader.load(explicit);
                let config = Config::from_params(&spec.params);
                (RequirementChecker::new(&env, &config).validate(&spec), None)
            }
        };

        self.write_report(&validation, out)?;
        if let Some(host) = &host {
            self.write_actions(host, out)?;
        }

        if validation.is_valid() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(EXIT_NOT_VALID))
        }
    }
}
