//! Segmentation followed by normalization, in one call.

use image::{imageops, RgbaImage};

use crate::error::Result;
use crate::matte::TransparencyMatte;
use crate::render::{Canvas, FrameNormalizer};
use crate::report::Report;
use crate::segment::{Frame, SegmentConfig, Segmentation, Segmenter};
use crate::types::BoundingBox;

/// Frames cut from one sheet.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub segmentation: Segmentation,
    /// One canvas per frame, in reading order.
    pub canvases: Vec<Canvas>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }
}

/// Segment `img` and fit every frame into the normalizer's canvas size.
///
/// Fails only on an invalid `config`; content problems are left in the
/// segmentation report.
pub fn extract_frames(
    img: &RgbaImage,
    config: &SegmentConfig,
    normalizer: &FrameNormalizer,
) -> Result<Extraction> {
    let segmentation = Segmenter::new(config.clone())?.segment(img);
    let canvases = normalizer.normalize_all(img, &segmentation.frames);
    Ok(Extraction {
        segmentation,
        canvases,
    })
}

/// Like [`FrameNormalizer::normalize_all`], but mattes each crop first.
///
/// The flood fill is seeded from the corners of every padded crop rather
/// than the whole sheet, so sheets whose background drifts between frames
/// still matte cleanly. Diagnostics from every frame are merged.
pub fn matte_frames(
    img: &RgbaImage,
    frames: &[Frame],
    normalizer: &FrameNormalizer,
    matte: &TransparencyMatte,
) -> (Vec<Canvas>, Report) {
    let mut report = Report::new();
    let mut canvases = Vec::with_capacity(frames.len());

    for frame in frames {
        let b = frame.bounds.clamp_to(img.width(), img.height());
        let crop = imageops::crop_imm(img, b.x, b.y, b.w, b.h).to_image();
        let matted = matte.apply(&crop);
        report.merge(matted.report);

        let local = Frame {
            bounds: BoundingBox::new(0, 0, b.w, b.h),
            ..*frame
        };
        canvases.push(normalizer.normalize(&matted.image, &local));
    }

    (canvases, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Resample;
    use image::Rgba;

    const BG: Rgba<u8> = Rgba([0, 128, 0, 255]);

    #[test]
    fn test_extract_two_frames() {
        let mut img = RgbaImage::from_pixel(40, 20, BG);
        for y in 4..12 {
            for x in 2..6 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
            for x in 20..36 {
                img.put_pixel(x, y, Rgba([200, 0, 0, 255]));
            }
        }

        let config = SegmentConfig {
            factor: 1,
            min_pixels: 1,
            padding: 0,
            ..Default::default()
        };
        let normalizer = FrameNormalizer::new(16, 16, Resample::Nearest).unwrap();
        let extraction = extract_frames(&img, &config, &normalizer).unwrap();

        assert_eq!(extraction.len(), 2);
        // First frame is the narrow white one, upscaled to 8x16
        let first = &extraction.canvases[0].image;
        assert_eq!(first.get_pixel(7, 15).0, [255, 255, 255, 255]);
        assert_eq!(first.get_pixel(3, 15)[3], 0);
        // Second is 16x8, already the canvas width
        let second = &extraction.canvases[1].image;
        assert_eq!(second.get_pixel(0, 15).0, [200, 0, 0, 255]);
        assert_eq!(second.get_pixel(0, 7)[3], 0);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let img = RgbaImage::from_pixel(4, 4, BG);
        let config = SegmentConfig {
            factor: 0,
            ..Default::default()
        };
        let normalizer = FrameNormalizer::new(8, 8, Resample::Auto).unwrap();
        assert!(extract_frames(&img, &config, &normalizer).is_err());
    }

    #[test]
    fn test_matte_frames_clears_crop_background() {
        let mut img = RgbaImage::from_pixel(20, 20, BG);
        for y in 6..14 {
            for x in 6..14 {
                img.put_pixel(x, y, Rgba([250, 250, 0, 255]));
            }
        }

        let config = SegmentConfig {
            factor: 1,
            min_pixels: 1,
            padding: 2,
            ..Default::default()
        };
        let seg = Segmenter::new(config).unwrap().segment(&img);
        assert_eq!(seg.frames[0].bounds, BoundingBox::new(4, 4, 12, 12));

        let normalizer = FrameNormalizer::new(12, 12, Resample::Nearest).unwrap();
        let (canvases, report) =
            matte_frames(&img, &seg.frames, &normalizer, &TransparencyMatte::default());

        assert!(report.is_empty());
        let canvas = &canvases[0].image;
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
        assert_eq!(canvas.get_pixel(1, 11)[3], 0);
        assert_eq!(canvas.get_pixel(6, 6).0, [250, 250, 0, 255]);
    }

    #[test]
    fn test_empty_sheet_yields_no_canvases() {
        let img = RgbaImage::from_pixel(16, 16, BG);
        let normalizer = FrameNormalizer::new(8, 8, Resample::Auto).unwrap();
        let extraction = extract_frames(&img, &SegmentConfig::default(), &normalizer).unwrap();
        assert!(extraction.is_empty());
        assert!(extraction.segmentation.report.has_warnings());
    }
}
