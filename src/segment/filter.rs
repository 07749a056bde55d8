//! Size-based component filtering.

use crate::error::{CutError, Result};
use crate::report::{Diagnostic, DiagnosticKind, DropReason, Report};

use super::Component;

/// Default noise floor, in labeling-grid cells.
pub const DEFAULT_MIN_PIXELS: u32 = 100;

/// Default merge ceiling, in labeling-grid cells.
pub const DEFAULT_MAX_PIXELS: u32 = 15_000;

/// Keeps components whose cell count lies in `min_pixels..=max_pixels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFilter {
    min_pixels: u32,
    max_pixels: u32,
}

impl Default for ComponentFilter {
    fn default() -> Self {
        Self {
            min_pixels: DEFAULT_MIN_PIXELS,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl ComponentFilter {
    pub fn new(min_pixels: u32, max_pixels: u32) -> Result<Self> {
        if min_pixels > max_pixels {
            return Err(CutError::Config {
                message: format!(
                    "Minimum component size {} exceeds maximum {}",
                    min_pixels, max_pixels
                ),
                help: Some("Check --min-pixels and --max-pixels".to_string()),
            });
        }
        Ok(Self {
            min_pixels,
            max_pixels,
        })
    }

    pub fn min_pixels(&self) -> u32 {
        self.min_pixels
    }

    pub fn max_pixels(&self) -> u32 {
        self.max_pixels
    }

    /// Why `component` would be dropped, if it would.
    pub fn reject_reason(&self, component: &Component) -> Option<DropReason> {
        if component.pixel_count < self.min_pixels {
            Some(DropReason::Noise)
        } else if component.pixel_count > self.max_pixels {
            Some(DropReason::Oversized)
        } else {
            None
        }
    }

    /// Split `components` into retained and dropped, reporting every drop.
    ///
    /// `factor` is the downsample factor, used to report full-resolution
    /// bounds. Input order is preserved in both outputs.
    pub fn apply(
        &self,
        components: Vec<Component>,
        factor: u32,
        report: &mut Report,
    ) -> (Vec<Component>, Vec<Component>) {
        let mut retained = Vec::with_capacity(components.len());
        let mut dropped = Vec::new();

        for component in components {
            match self.reject_reason(&component) {
                None => retained.push(component),
                Some(reason) => {
                    report.push(self.drop_diagnostic(&component, reason, factor));
                    dropped.push(component);
                }
            }
        }

        (retained, dropped)
    }

    fn drop_diagnostic(&self, component: &Component, reason: DropReason, factor: u32) -> Diagnostic {
        let (message, help) = match reason {
            DropReason::Noise => (
                format!(
                    "Dropped noise component ({} < {} cells)",
                    component.pixel_count, self.min_pixels
                ),
                "Lower --min-pixels if real frames are being dropped",
            ),
            DropReason::Oversized => (
                format!(
                    "Dropped oversized component ({} > {} cells)",
                    component.pixel_count, self.max_pixels
                ),
                "Touching frames merge into one blob; raise --max-pixels or --threshold",
            ),
        };

        Diagnostic::warning(DiagnosticKind::ComponentDropped { reason }, message)
            .with_help(help)
            .with_component(component.summary(factor))
    }
}
