//! Sprite sheet segmentation.
//!
//! Splits a composite image of loosely arranged sprites into frame
//! rectangles in reading order:
//!
//! 1. [`BackgroundMatcher`] samples the background colour at (0,0)
//! 2. [`Downsampler`] shrinks the image by an integer factor
//! 3. [`label_components`] finds 4-connected blobs of content cells
//! 4. [`ComponentFilter`] drops noise and merged blobs
//! 5. [`BoundingBoxMapper`] scales the survivors back up and pads them
//! 6. [`RowClusterer`] orders them row by row, left to right
//!
//! Every stage takes its parameters explicitly; [`SegmentConfig`] bundles
//! them for the [`Segmenter`].

mod background;
mod bbox;
mod disjoint_set;
mod downsample;
mod filter;
mod label;
mod mask;
mod rows;

pub use background::{is_content, BackgroundMatcher, DEFAULT_CONTENT_THRESHOLD};
pub use bbox::{BoundingBoxMapper, DEFAULT_PADDING};
pub use disjoint_set::DisjointSet;
pub use downsample::{Downsampler, DEFAULT_FACTOR};
pub use filter::{ComponentFilter, DEFAULT_MAX_PIXELS, DEFAULT_MIN_PIXELS};
pub use label::{label_components, Component, Labeling};
pub use mask::ContentMask;
pub use rows::{Frame, RowClusterer, DEFAULT_ROW_OVERLAP};

use image::RgbaImage;

use crate::error::Result;
use crate::report::{Diagnostic, DiagnosticKind, Report};
use crate::types::{BoundingBox, Colour};

/// Parameters for a segmentation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfig {
    /// Downsample factor for labeling.
    pub factor: u32,
    /// Content threshold (sum of absolute channel differences).
    pub content_threshold: u32,
    /// Smallest retained component, in labeling-grid cells.
    pub min_pixels: u32,
    /// Largest retained component, in labeling-grid cells.
    pub max_pixels: u32,
    /// Padding added around each frame, in full-resolution pixels.
    pub padding: u32,
    /// Vertical overlap ratio for row clustering.
    pub row_overlap: f64,
    /// Explicit background colour; sampled from (0,0) when `None`.
    pub background: Option<Colour>,
    /// Number of frames the caller expects, if known.
    pub expected_frames: Option<usize>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            factor: DEFAULT_FACTOR,
            content_threshold: DEFAULT_CONTENT_THRESHOLD,
            min_pixels: DEFAULT_MIN_PIXELS,
            max_pixels: DEFAULT_MAX_PIXELS,
            padding: DEFAULT_PADDING,
            row_overlap: DEFAULT_ROW_OVERLAP,
            background: None,
            expected_frames: None,
        }
    }
}

/// Output of [`Segmenter::segment`].
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Frames in reading order.
    pub frames: Vec<Frame>,
    /// Retained components; `retained[i]` produced `frames[i]`.
    pub retained: Vec<Component>,
    /// Components removed by the size filter, by root label.
    pub dropped: Vec<Component>,
    /// Background reference colour, `None` for an empty image.
    pub reference: Option<Colour>,
    /// Labeling grid size.
    pub grid: (u32, u32),
    /// Downsample factor the grid was labeled at.
    pub factor: u32,
    /// Non-fatal findings.
    pub report: Report,
}

impl Segmentation {
    /// Number of content cells in the labeling grid.
    pub fn content_cells(&self) -> u64 {
        self.retained
            .iter()
            .chain(&self.dropped)
            .map(|c| u64::from(c.pixel_count))
            .sum()
    }
}

/// Runs the segmentation stages with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentConfig,
    downsampler: Downsampler,
    filter: ComponentFilter,
    clusterer: RowClusterer,
}

impl Segmenter {
    /// Validate `config` and build the stages.
    pub fn new(config: SegmentConfig) -> Result<Self> {
        let downsampler = Downsampler::new(config.factor)?;
        let filter = ComponentFilter::new(config.min_pixels, config.max_pixels)?;
        let clusterer = RowClusterer::new(config.row_overlap)?;
        Ok(Self {
            config,
            downsampler,
            filter,
            clusterer,
        })
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Segment `img` into frames.
    ///
    /// Never fails: an image without content yields zero frames and an
    /// `EmptyContent` diagnostic, and an unexpected frame count is reported
    /// alongside the components that were kept.
    pub fn segment(&self, img: &RgbaImage) -> Segmentation {
        let factor = self.downsampler.factor();
        let mut report = Report::new();

        let matcher = match self.config.background {
            Some(colour) => Some(BackgroundMatcher::new(colour, self.config.content_threshold)),
            None => BackgroundMatcher::sample(img, self.config.content_threshold),
        };

        let small = self.downsampler.apply(img);
        let grid = (small.width(), small.height());

        let mask = match &matcher {
            Some(m) => m.content_mask(&small),
            None => ContentMask::new(grid.0, grid.1),
        };

        let mut segmentation = Segmentation {
            frames: Vec::new(),
            retained: Vec::new(),
            dropped: Vec::new(),
            reference: matcher.map(|m| m.reference()),
            grid,
            factor,
            report: Report::new(),
        };

        if mask.is_blank() {
            report.push(
                Diagnostic::warning(
                    DiagnosticKind::EmptyContent,
                    "No content pixels differ from the background",
                )
                .with_help("Lower --threshold, or check that (0,0) is background"),
            );
            self.check_expected(&segmentation.retained, factor, &mut report);
            segmentation.report = report;
            return segmentation;
        }

        let components = label_components(&mask).into_components();
        let (retained, dropped) = self.filter.apply(components, factor, &mut report);

        let mapper = BoundingBoxMapper::new(factor, self.config.padding, img.width(), img.height());
        let boxes: Vec<BoundingBox> = retained.iter().map(|c| mapper.map(c)).collect();
        let frames = self.clusterer.order(&boxes);

        let retained: Vec<Component> = frames.iter().map(|f| retained[f.source]).collect();
        self.check_expected(&retained, factor, &mut report);

        segmentation.frames = frames;
        segmentation.retained = retained;
        segmentation.dropped = dropped;
        segmentation.report = report;
        segmentation
    }

    fn check_expected(&self, retained: &[Component], factor: u32, report: &mut Report) {
        let Some(expected) = self.config.expected_frames else {
            return;
        };
        if retained.len() == expected {
            return;
        }

        report.push(
            Diagnostic::warning(
                DiagnosticKind::ComponentCountMismatch {
                    expected,
                    found: retained.len(),
                },
                format!("Expected {} frames, found {}", expected, retained.len()),
            )
            .with_help(if retained.len() < expected {
                "Frames may be merged or filtered; try a smaller --factor or --min-pixels"
            } else {
                "Frames may be split or noisy; try a larger --min-pixels or --threshold"
            }),
        );

        for (index, component) in retained.iter().enumerate() {
            report.push(
                Diagnostic::note(
                    DiagnosticKind::RetainedComponent,
                    format!("Frame {}", index),
                )
                .with_component(component.summary(factor)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BG: Rgba<u8> = Rgba([255, 0, 255, 255]);
    const INK: Rgba<u8> = Rgba([20, 20, 20, 255]);

    fn fill(img: &mut RgbaImage, b: BoundingBox, colour: Rgba<u8>) {
        for y in b.y..b.bottom() {
            for x in b.x..b.right() {
                img.put_pixel(x, y, colour);
            }
        }
    }

    fn full_res_config() -> SegmentConfig {
        SegmentConfig {
            factor: 1,
            min_pixels: 1,
            padding: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SegmentConfig {
            factor: 0,
            ..Default::default()
        };
        assert!(Segmenter::new(config).is_err());

        let config = SegmentConfig {
            min_pixels: 10,
            max_pixels: 1,
            ..Default::default()
        };
        assert!(Segmenter::new(config).is_err());
    }

    #[test]
    fn test_empty_content_reported() {
        let img = RgbaImage::from_pixel(32, 32, BG);
        let seg = Segmenter::new(SegmentConfig::default()).unwrap().segment(&img);

        assert!(seg.frames.is_empty());
        assert!(seg.report.any(|k| *k == DiagnosticKind::EmptyContent));
        assert_eq!(seg.reference, Some(Colour::MAGENTA));
    }

    #[test]
    fn test_zero_sized_image() {
        let img = RgbaImage::new(0, 0);
        let seg = Segmenter::new(SegmentConfig::default()).unwrap().segment(&img);
        assert!(seg.frames.is_empty());
        assert!(seg.reference.is_none());
        assert!(seg.report.any(|k| *k == DiagnosticKind::EmptyContent));
    }

    #[test]
    fn test_frames_follow_reading_order() {
        let mut img = RgbaImage::from_pixel(60, 40, BG);
        fill(&mut img, BoundingBox::new(40, 2, 8, 8), INK);
        fill(&mut img, BoundingBox::new(2, 4, 8, 8), INK);
        fill(&mut img, BoundingBox::new(20, 25, 8, 8), INK);

        let seg = Segmenter::new(full_res_config()).unwrap().segment(&img);
        let bounds: Vec<BoundingBox> = seg.frames.iter().map(|f| f.bounds).collect();
        assert_eq!(
            bounds,
            vec![
                BoundingBox::new(2, 4, 8, 8),
                BoundingBox::new(40, 2, 8, 8),
                BoundingBox::new(20, 25, 8, 8),
            ]
        );
        for (frame, component) in seg.frames.iter().zip(&seg.retained) {
            assert_eq!(frame.bounds, component.full_res_bounds(1));
        }
    }

    #[test]
    fn test_explicit_background_overrides_corner() {
        // The corner is ink, but the declared background is magenta
        let mut img = RgbaImage::from_pixel(20, 20, BG);
        fill(&mut img, BoundingBox::new(0, 0, 5, 5), INK);

        let config = SegmentConfig {
            background: Some(Colour::MAGENTA),
            ..full_res_config()
        };
        let seg = Segmenter::new(config).unwrap().segment(&img);
        assert_eq!(seg.frames.len(), 1);
        assert_eq!(seg.frames[0].bounds, BoundingBox::new(0, 0, 5, 5));
    }

    #[test]
    fn test_count_mismatch_lists_components() {
        let mut img = RgbaImage::from_pixel(40, 20, BG);
        fill(&mut img, BoundingBox::new(2, 2, 6, 6), INK);
        fill(&mut img, BoundingBox::new(20, 2, 6, 6), INK);

        let config = SegmentConfig {
            expected_frames: Some(3),
            ..full_res_config()
        };
        let seg = Segmenter::new(config).unwrap().segment(&img);

        assert_eq!(seg.frames.len(), 2);
        assert!(seg.report.any(|k| *k
            == DiagnosticKind::ComponentCountMismatch {
                expected: 3,
                found: 2
            }));
        let listed = seg
            .report
            .iter()
            .filter(|d| d.kind == DiagnosticKind::RetainedComponent)
            .count();
        assert_eq!(listed, 2);
    }

    #[test]
    fn test_matching_count_is_silent() {
        let mut img = RgbaImage::from_pixel(20, 20, BG);
        fill(&mut img, BoundingBox::new(5, 5, 5, 5), INK);

        let config = SegmentConfig {
            expected_frames: Some(1),
            ..full_res_config()
        };
        let seg = Segmenter::new(config).unwrap().segment(&img);
        assert!(seg.report.is_empty());
    }

    #[test]
    fn test_dropped_components_kept_for_inspection() {
        let mut img = RgbaImage::from_pixel(30, 30, BG);
        fill(&mut img, BoundingBox::new(2, 2, 10, 10), INK);
        img.put_pixel(25, 25, INK);

        let config = SegmentConfig {
            min_pixels: 4,
            ..full_res_config()
        };
        let seg = Segmenter::new(config).unwrap().segment(&img);
        assert_eq!(seg.frames.len(), 1);
        assert_eq!(seg.dropped.len(), 1);
        assert_eq!(seg.dropped[0].pixel_count, 1);
        assert_eq!(seg.content_cells(), 101);
    }
}
