//! wp-requirements CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wp_requirements::cli::{Cli, CommandDispatcher};

/// Exit code for hard errors (unreadable snapshot, bad explicit requirements).
const EXIT_ERROR: u8 = 2;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("wp_requirements=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wp_requirements=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("wp-requirements starting with args: {:?}", cli);

    if cli.no_color {
        console::set_colors_enabled(false);
    }
    let use_color = !cli.no_color && console::colors_enabled();

    let dispatcher = CommandDispatcher::new(use_color);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match dispatcher.dispatch(&cli, &mut out) {
        Ok(result) => {
            let _ = out.flush();
            ExitCode::from(result.exit_code as u8)
        }
        Err(e) => {
            let _ = out.flush();
            let style = console::Style::new().red().bold().for_stderr();
            eprintln!("{} {}", style.apply_to("Error:"), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
