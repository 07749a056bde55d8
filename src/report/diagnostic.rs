//! Diagnostic types for segmentation and matte runs.

use std::fmt;

use serde::Serialize;

use crate::types::BoundingBox;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Note,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Why a component was removed by the size filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropReason {
    /// Fewer cells than the noise floor.
    Noise,
    /// More cells than the merge ceiling (touching frames, posters).
    Oversized,
}

/// The condition a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The image contained no content pixels at all.
    EmptyContent,
    /// A component was removed by the size filter.
    ComponentDropped { reason: DropReason },
    /// The number of retained components differs from what the caller expected.
    ComponentCountMismatch { expected: usize, found: usize },
    /// A retained component, listed to explain a count mismatch.
    RetainedComponent,
    /// The flood fill could not grow from any corner seed.
    DegenerateSeed { seeds: usize },
    /// The flood fill reached every pixel of the image.
    MatteClearedAll,
}

impl DiagnosticKind {
    /// Machine-readable code, e.g. `spritecut::segment::empty-content`.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::EmptyContent => "spritecut::segment::empty-content",
            DiagnosticKind::ComponentDropped { .. } => "spritecut::segment::component-dropped",
            DiagnosticKind::ComponentCountMismatch { .. } => {
                "spritecut::segment::component-count-mismatch"
            }
            DiagnosticKind::RetainedComponent => "spritecut::segment::retained-component",
            DiagnosticKind::DegenerateSeed { .. } => "spritecut::matte::degenerate-seed",
            DiagnosticKind::MatteClearedAll => "spritecut::matte::cleared-all",
        }
    }
}

/// Component details attached to a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    /// Root label of the component.
    pub id: u32,
    /// Number of cells in the (possibly downsampled) labeling grid.
    pub pixel_count: u32,
    /// Unpadded full-resolution bounds.
    pub bounds: BoundingBox,
}

/// A single diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Structured condition.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
    /// Optional help text suggesting which parameter to tune.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// The component the diagnostic is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentSummary>,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            help: None,
            component: None,
        }
    }

    /// Create a note diagnostic.
    pub fn note(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            kind,
            message: message.into(),
            help: None,
            component: None,
        }
    }

    /// Add help text to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach component details.
    pub fn with_component(mut self, component: ComponentSummary) -> Self {
        self.component = Some(component);
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_namespaced() {
        let kinds = [
            DiagnosticKind::EmptyContent,
            DiagnosticKind::ComponentDropped { reason: DropReason::Noise },
            DiagnosticKind::ComponentCountMismatch { expected: 1, found: 2 },
            DiagnosticKind::RetainedComponent,
            DiagnosticKind::DegenerateSeed { seeds: 4 },
            DiagnosticKind::MatteClearedAll,
        ];
        for kind in kinds {
            assert!(kind.code().starts_with("spritecut::"), "{}", kind.code());
        }
    }

    #[test]
    fn test_diagnostic_builders() {
        let summary = ComponentSummary {
            id: 3,
            pixel_count: 12,
            bounds: BoundingBox::new(0, 0, 4, 4),
        };
        let d = Diagnostic::warning(
            DiagnosticKind::ComponentDropped { reason: DropReason::Noise },
            "tiny",
        )
        .with_help("lower --min-pixels")
        .with_component(summary);

        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.help.as_deref(), Some("lower --min-pixels"));
        assert_eq!(d.component, Some(summary));
        assert_eq!(d.code(), "spritecut::segment::component-dropped");
    }

    #[test]
    fn test_serialize_flattens_kind() {
        let d = Diagnostic::warning(
            DiagnosticKind::ComponentCountMismatch { expected: 14, found: 12 },
            "count",
        );
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(value["kind"], "component-count-mismatch");
        assert_eq!(value["expected"], 14);
        assert_eq!(value["found"], 12);
        assert_eq!(value["severity"], "warning");
        assert!(value.get("help").is_none());
    }
}
