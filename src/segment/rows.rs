//! Reading-order clustering of frame boxes.
//!
//! Hand-arranged sheets rarely sit on an exact grid, so rows are recovered
//! by vertical overlap: boxes are visited top to bottom and join the current
//! row while their top edge starts above `row.top + row.height * overlap`.
//! The row's reference top and height come from its first member.

use serde::Serialize;

use crate::error::{CutError, Result};
use crate::types::BoundingBox;

/// Default vertical overlap ratio.
pub const DEFAULT_ROW_OVERLAP: f64 = 0.5;

/// One extracted frame in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Position in the output sequence.
    pub index: usize,
    /// Row the frame was clustered into.
    pub row: usize,
    /// Full-resolution crop rectangle.
    pub bounds: BoundingBox,
    /// Position of the box in the clusterer input.
    pub source: usize,
}

/// Orders boxes row by row, left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowClusterer {
    overlap: f64,
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self {
            overlap: DEFAULT_ROW_OVERLAP,
        }
    }
}

impl RowClusterer {
    pub fn new(overlap: f64) -> Result<Self> {
        if !overlap.is_finite() || overlap <= 0.0 {
            return Err(CutError::Config {
                message: format!("Row overlap must be a positive ratio, got {}", overlap),
                help: Some("0.5 groups boxes whose tops fall in the upper half of a row".to_string()),
            });
        }
        Ok(Self { overlap })
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    /// Cluster `boxes` into rows and return frames in reading order.
    ///
    /// Sorting is stable, so boxes with equal keys keep their input order
    /// and the output is deterministic for a given input sequence.
    pub fn order(&self, boxes: &[BoundingBox]) -> Vec<Frame> {
        let mut by_top: Vec<usize> = (0..boxes.len()).collect();
        by_top.sort_by_key(|&i| boxes[i].y);

        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut row_limit = 0.0f64;

        for i in by_top {
            let b = boxes[i];
            if !current.is_empty() && f64::from(b.y) < row_limit {
                current.push(i);
                continue;
            }
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            row_limit = f64::from(b.y) + f64::from(b.h) * self.overlap;
            current.push(i);
        }
        if !current.is_empty() {
            rows.push(current);
        }

        let mut frames = Vec::with_capacity(boxes.len());
        for (row, mut members) in rows.into_iter().enumerate() {
            members.sort_by_key(|&i| boxes[i].x);
            for source in members {
                frames.push(Frame {
                    index: frames.len(),
                    row,
                    bounds: boxes[source],
                    source,
                });
            }
        }

        frames
    }
}
