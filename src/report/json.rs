//! JSON report formatter.
//!
//! Writes `{"valid": bool, "results": {...}}` for tooling integration.

use std::io::Write;

use super::ReportFormatter;
use crate::requirements::checker::{CheckOutcome, Validation};

/// Formats reports as JSON.
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write + ?Sized>(
        &self,
        validation: &Validation,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let outcome = CheckOutcome {
            valid: validation.is_valid(),
            results: validation.results.clone(),
        };

        serde_json::to_writer_pretty(&mut *writer, &outcome).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}
