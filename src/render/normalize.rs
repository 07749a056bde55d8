//! Fitting frames into fixed-size canvases.
//!
//! Each frame is cropped from the source, scaled uniformly so it fits the
//! target size, and pasted onto a transparent canvas. Frames are centred
//! horizontally and anchored to the bottom edge so that characters share a
//! ground line across an animation.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{CutError, Result};
use crate::segment::Frame;

/// Resampling policy for resized frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    /// Lanczos when shrinking, nearest-neighbour when enlarging.
    #[default]
    Auto,
    /// Always nearest-neighbour.
    Nearest,
    /// Always Lanczos.
    Lanczos,
}

impl Resample {
    fn filter(self, downscaling: bool) -> FilterType {
        match self {
            Resample::Auto if downscaling => FilterType::Lanczos3,
            Resample::Auto | Resample::Nearest => FilterType::Nearest,
            Resample::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for Resample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resample::Auto => write!(f, "auto"),
            Resample::Nearest => write!(f, "nearest"),
            Resample::Lanczos => write!(f, "lanczos"),
        }
    }
}

impl FromStr for Resample {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Resample::Auto),
            "nearest" => Ok(Resample::Nearest),
            "lanczos" => Ok(Resample::Lanczos),
            _ => Err(CutError::Parse {
                message: format!("Unknown resample mode '{}'", s),
                help: Some("Use auto, nearest, or lanczos".to_string()),
            }),
        }
    }
}

/// One normalized frame.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Sequence index of the frame this canvas was made from.
    pub index: usize,
    pub image: RgbaImage,
}

impl Canvas {
    /// File name for this canvas, e.g. `frame_03.png`.
    ///
    /// `total` is the number of canvases in the sequence; indices are
    /// zero-padded to at least two digits and widened to fit `total - 1`.
    pub fn file_name(&self, prefix: &str, total: usize) -> String {
        let digits = total.saturating_sub(1).to_string().len().max(2);
        format!("{}_{:0width$}.png", prefix, self.index, width = digits)
    }
}

/// Crops, scales, and anchors frames into `width` x `height` canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameNormalizer {
    width: u32,
    height: u32,
    resample: Resample,
}

impl FrameNormalizer {
    pub fn new(width: u32, height: u32, resample: Resample) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CutError::Config {
                message: format!("Canvas size must be non-zero, got {}x{}", width, height),
                help: Some("Pass --size WxH, for example --size 64x64".to_string()),
            });
        }
        Ok(Self {
            width,
            height,
            resample,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resample(&self) -> Resample {
        self.resample
    }

    /// Size a `src_w` x `src_h` crop takes on the canvas.
    ///
    /// Scales by `min(width / src_w, height / src_h)`. The limiting axis
    /// fills the canvas exactly; the other axis rounds down, never below one
    /// pixel.
    pub fn fitted_size(&self, src_w: u32, src_h: u32) -> (u32, u32) {
        if src_w == 0 || src_h == 0 {
            return (0, 0);
        }
        let (tw, th) = (u64::from(self.width), u64::from(self.height));
        let (sw, sh) = (u64::from(src_w), u64::from(src_h));

        if tw * sh <= th * sw {
            let h = (sh * tw / sw).clamp(1, th);
            (self.width, h as u32)
        } else {
            let w = (sw * th / sh).clamp(1, tw);
            (w as u32, self.height)
        }
    }

    /// Normalize one frame of `source`.
    ///
    /// The frame bounds are clamped to the source; a frame with no area
    /// produces a blank canvas.
    pub fn normalize(&self, source: &RgbaImage, frame: &Frame) -> Canvas {
        let mut canvas = RgbaImage::new(self.width, self.height);
        let bounds = frame.bounds.clamp_to(source.width(), source.height());

        if !bounds.is_empty() {
            let crop = imageops::crop_imm(source, bounds.x, bounds.y, bounds.w, bounds.h).to_image();
            let (w, h) = self.fitted_size(bounds.w, bounds.h);

            let resized = if (w, h) == (bounds.w, bounds.h) {
                crop
            } else {
                let downscaling = w < bounds.w || h < bounds.h;
                imageops::resize(&crop, w, h, self.resample.filter(downscaling))
            };

            let offset_x = (self.width - w) / 2;
            let offset_y = self.height - h;
            imageops::replace(&mut canvas, &resized, i64::from(offset_x), i64::from(offset_y));
        }

        Canvas {
            index: frame.index,
            image: canvas,
        }
    }

    /// Normalize every frame, in sequence order.
    pub fn normalize_all(&self, source: &RgbaImage, frames: &[Frame]) -> Vec<Canvas> {
        frames.iter().map(|f| self.normalize(source, f)).collect()
    }
}
