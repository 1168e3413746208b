//! Report formatters.
//!
//! This module provides formatters for writing a validation outcome in
//! different formats (human-readable, JSON).

pub mod human;
pub mod json;

use std::io::Write;

use crate::requirements::checker::Validation;

/// Output format for check reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Trait for formatting a validation outcome.
pub trait ReportFormatter {
    /// Format the validation to the given writer.
    fn format<W: Write + ?Sized>(
        &self,
        validation: &Validation,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

pub use human::HumanFormatter;
pub use json::JsonFormatter;
