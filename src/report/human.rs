//! Human-readable report formatter.
//!
//! One line per requirement with a status mark, then a summary line.

use std::io::Write;

use console::Style;

use super::ReportFormatter;
use crate::requirements::checker::Validation;
use crate::requirements::status::{Check, Leaf};

/// Formats reports for terminal display.
pub struct HumanFormatter {
    /// Whether to use colors (ANSI escape codes).
    pub use_color: bool,
}

impl HumanFormatter {
    /// Create a new human formatter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn style(&self, satisfied: bool) -> Style {
        match (self.use_color, satisfied) {
            (false, _) => Style::new(),
            (true, true) => Style::new().green(),
            (true, false) => Style::new().red().bold(),
        }
    }

    fn describe(leaf: &Leaf<'_>) -> String {
        match leaf.check {
            Check::Version => format!("{} version", leaf.section),
            Check::Extension(name) => format!("{} extension {}", leaf.section, name),
            Check::Plugin(slug) => format!("{} plugin {}", leaf.section, slug),
            Check::Theme(slug) => format!("{} theme {}", leaf.section, slug),
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write + ?Sized>(
        &self,
        validation: &Validation,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let leaves = validation.results.leaves();

        for leaf in &leaves {
            let mark = if leaf.satisfied { "✓" } else { "✗" };
            let mut line = format!(
                "{} {}",
                self.style(leaf.satisfied).apply_to(mark),
                Self::describe(leaf)
            );
            if let Some(required) = validation.required.version_for(leaf.section, leaf.check) {
                line.push_str(&format!(" (required {})", required));
            }
            writeln!(writer, "{}", line)?;
        }

        let failed = leaves.iter().filter(|l| !l.satisfied).count();
        if leaves.is_empty() {
            writeln!(writer, "No requirements to check")?;
        } else if failed == 0 {
            let summary = format!("All {} requirement(s) met", leaves.len());
            writeln!(writer, "{}", self.style(true).apply_to(summary))?;
        } else {
            let summary = format!("{} of {} requirement(s) not met", failed, leaves.len());
            writeln!(writer, "{}", self.style(false).apply_to(summary))?;
        }

        Ok(())
    }
}
