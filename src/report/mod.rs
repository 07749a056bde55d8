//! Non-fatal findings of a segmentation or matte run.
//!
//! Thresholds in the pipeline are heuristics, so anything short of an
//! unreadable input is collected here rather than returned as an error.
//! The CLI prints the report; library callers can inspect it.

mod diagnostic;

pub use diagnostic::{ComponentSummary, Diagnostic, DiagnosticKind, DropReason, Severity};

use serde::Serialize;

use crate::output::{plural, Printer};

/// Collects diagnostics from pipeline stages.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Count warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are no diagnostics at all.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check whether any diagnostic matches `pred`.
    pub fn any(&self, pred: impl Fn(&DiagnosticKind) -> bool) -> bool {
        self.diagnostics.iter().any(|d| pred(&d.kind))
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: Report) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Print a report through the status printer.
///
/// Dropped-component notes are only shown in verbose mode; they are
/// expected on any real sheet and would drown out the rest.
pub fn print_report(report: &Report, printer: &Printer) {
    let mut hidden = 0usize;

    for d in report.iter() {
        if matches!(d.kind, DiagnosticKind::ComponentDropped { .. }) && !printer.is_verbose() {
            hidden += 1;
            continue;
        }

        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Warning);
        let mut line = format!("{}[{}]: {}", label, d.code(), d.message);
        if let Some(c) = &d.component {
            line.push_str(&printer.dim(&format!(
                " (component {}, {} cells, {})",
                c.id, c.pixel_count, c.bounds
            )));
        }
        eprintln!("  {}", line);
        if let Some(help) = &d.help {
            eprintln!("    help: {}", help);
        }
    }

    if hidden > 0 {
        printer.info(
            "Dropped",
            &format!(
                "{} (use --verbose for details)",
                plural(hidden, "component", "components")
            ),
        );
    }
}
