//! Shell completions generation.
//!
//! The `wp-requirements completions <shell>` command prints a completion
//! script covering the `check` flags and the `--format` values.

use std::io::Write;

use anyhow::Context;
use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Render the completion script for the configured shell.
    pub fn script(&self) -> Vec<u8> {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        let mut script = Vec::new();
        clap_complete::generate(self.args.shell, &mut cmd, bin_name, &mut script);
        script
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        out.write_all(&self.script())
            .with_context(|| format!("Failed to write {} completions", self.args.shell))?;
        Ok(CommandResult::success())
    }
}
