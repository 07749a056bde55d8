//! Mapping grid components back to padded full-resolution boxes.

use crate::types::BoundingBox;

use super::Component;

/// Default padding margin in full-resolution pixels.
pub const DEFAULT_PADDING: u32 = 4;

/// Scales component bounds by the downsample factor and pads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBoxMapper {
    factor: u32,
    padding: u32,
    image_width: u32,
    image_height: u32,
}

impl BoundingBoxMapper {
    /// `image_width` and `image_height` are the full-resolution bounds every
    /// padded box is clamped to.
    pub fn new(factor: u32, padding: u32, image_width: u32, image_height: u32) -> Self {
        Self {
            factor,
            padding,
            image_width,
            image_height,
        }
    }

    /// Full-resolution box for `component`, grown by `padding` on every side
    /// and clamped to the image.
    pub fn map(&self, component: &Component) -> BoundingBox {
        let f = self.factor;
        let p = self.padding;

        let left = (component.min_x * f).saturating_sub(p);
        let top = (component.min_y * f).saturating_sub(p);
        let right = ((component.max_x + 1) * f).saturating_add(p).min(self.image_width);
        let bottom = ((component.max_y + 1) * f).saturating_add(p).min(self.image_height);

        BoundingBox::from_edges(left, top, right, bottom)
    }
}
