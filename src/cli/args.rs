//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::report::OutputFormat;

/// Check a WordPress host against a plugin's requirements.
#[derive(Debug, Parser)]
#[command(name = "wp-requirements")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate requirements against an environment snapshot
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Environment snapshot (JSON) describing the host
    #[arg(long, value_name = "FILE")]
    pub env: PathBuf,

    /// Requirements file to use instead of searching for wp-requirements.json
    #[arg(short, long, value_name = "FILE")]
    pub requirements: Option<PathBuf>,

    /// Main file of the plugin being checked
    #[arg(long, value_name = "FILE")]
    pub plugin_file: Option<PathBuf>,

    /// WordPress installation root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub wp_root: Option<PathBuf>,

    /// Content directory (defaults to <wp-root>/wp-content)
    #[arg(long, value_name = "DIR")]
    pub content_dir: Option<PathBuf>,

    /// Plugins directory (defaults to <content-dir>/plugins)
    #[arg(long, value_name = "DIR")]
    pub plugins_dir: Option<PathBuf>,

    /// Extra directory searched first for wp-requirements.json
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Run the configured failure actions when requirements are not met
    #[arg(long, requires = "plugin_file")]
    pub apply: bool,

    /// Print the rendered admin notice (with --apply)
    #[arg(long, requires = "apply")]
    pub notice: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_args() {
        let cli = Cli::try_parse_from([
            "wp-requirements",
            "check",
            "--env",
            "env.json",
            "--format",
            "json",
            "--plugin-file",
            "foo/foo.php",
            "--apply",
        ])
        .unwrap();

        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.env, PathBuf::from("env.json"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.apply);
        assert!(!args.notice);
    }

    #[test]
    fn apply_requires_plugin_file() {
        let result = Cli::try_parse_from(["wp-requirements", "check", "--env", "e.json", "--apply"]);
        assert!(result.is_err());
    }

    #[test]
    fn notice_requires_apply() {
        let result = Cli::try_parse_from([
            "wp-requirements",
            "check",
            "--env",
            "e.json",
            "--plugin-file",
            "p.php",
            "--notice",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["wp-requirements", "check", "--env", "e.json", "--debug"]).unwrap();
        assert!(cli.debug);
    }
}
