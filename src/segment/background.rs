//! Background colour detection and the content predicate.

use image::RgbaImage;

use crate::types::Colour;

use super::ContentMask;

/// Default content threshold (sum of absolute channel differences).
pub const DEFAULT_CONTENT_THRESHOLD: u32 = 30;

/// True when `pixel` differs from `reference` by more than `threshold`,
/// measured as the sum of absolute per-channel differences.
pub fn is_content(pixel: Colour, reference: Colour, threshold: u32) -> bool {
    pixel.manhattan_distance(reference) > threshold
}

/// Classifies pixels as background or content against a reference colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundMatcher {
    reference: Colour,
    threshold: u32,
}

impl BackgroundMatcher {
    /// Use an explicit reference colour.
    pub fn new(reference: Colour, threshold: u32) -> Self {
        Self {
            reference,
            threshold,
        }
    }

    /// Sample the reference colour from the top-left pixel.
    ///
    /// The corner is trusted as-is; an atypical corner pixel produces an
    /// atypical reference. Returns `None` for an empty image.
    pub fn sample(img: &RgbaImage, threshold: u32) -> Option<Self> {
        if img.width() == 0 || img.height() == 0 {
            return None;
        }
        Some(Self::new(Colour::from(img.get_pixel(0, 0)), threshold))
    }

    pub fn reference(&self) -> Colour {
        self.reference
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn is_content(&self, pixel: Colour) -> bool {
        is_content(pixel, self.reference, self.threshold)
    }

    /// Classify every pixel of `img`.
    pub fn content_mask(&self, img: &RgbaImage) -> ContentMask {
        ContentMask::from_fn(img.width(), img.height(), |x, y| {
            self.is_content(Colour::from(img.get_pixel(x, y)))
        })
    }
}
