//! Integer-factor nearest-neighbour downsampling.
//!
//! Labeling cost is linear in the grid size, so the segmenter labels a grid
//! shrunk by `factor` in both axes. Each output cell copies the top-left
//! pixel of its block; averaging would smear the hard background edge the
//! content threshold relies on. The lost boundary precision (under `factor`
//! pixels) is absorbed by bounding-box padding.

use image::{ImageBuffer, RgbaImage};

use crate::error::{CutError, Result};

/// Default downsample factor.
pub const DEFAULT_FACTOR: u32 = 4;

/// Shrinks images by an integer factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downsampler {
    factor: u32,
}

impl Downsampler {
    pub fn new(factor: u32) -> Result<Self> {
        if factor == 0 {
            return Err(CutError::Config {
                message: "Downsample factor must be at least 1".to_string(),
                help: Some("Use --factor 1 to label at full resolution".to_string()),
            });
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Output grid size: `ceil(width / factor)` x `ceil(height / factor)`.
    pub fn grid_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width.div_ceil(self.factor), height.div_ceil(self.factor))
    }

    /// Sample the top-left pixel of every `factor` x `factor` block.
    pub fn apply(&self, img: &RgbaImage) -> RgbaImage {
        if self.factor == 1 {
            return img.clone();
        }
        let (w, h) = self.grid_size(img.width(), img.height());
        let f = self.factor;
        ImageBuffer::from_fn(w, h, |x, y| *img.get_pixel(x * f, y * f))
    }
}
