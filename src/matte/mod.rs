//! Corner-seeded background removal.
//!
//! [`TransparencyMatte`] flood-fills from the four image corners and zeroes
//! the alpha of every pixel it reaches. A neighbour is admitted when its
//! colour is close to the colour of the pixel it was reached from, so the
//! fill follows soft gradients and vignettes instead of comparing against a
//! single reference colour.
//!
//! Pixels that no corner can reach keep their alpha even when they match
//! the background colour, which preserves enclosed regions such as eye
//! whites or window panes.
//!
//! Colours are always read from the borrowed input image and alpha is only
//! written to a separate output buffer; zeroed pixels are never compared
//! against.

use std::collections::VecDeque;

use image::RgbaImage;

use crate::report::{Diagnostic, DiagnosticKind, Report};
use crate::types::Colour;

/// Default squared RGB distance below which neighbours join the fill.
pub const DEFAULT_MATTE_THRESHOLD: u32 = 2000;

/// Result of [`TransparencyMatte::apply`].
#[derive(Debug, Clone)]
pub struct Matte {
    /// Output image: input colours with background alpha set to 0.
    pub image: RgbaImage,
    /// Number of pixels whose alpha was cleared.
    pub cleared: usize,
    /// Number of distinct corner seeds.
    pub seeds: usize,
    pub report: Report,
}

impl Matte {
    /// Whether the fill produced any change.
    pub fn is_noop(&self) -> bool {
        self.cleared == 0
    }
}

/// Multi-seed flood fill from the image corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransparencyMatte {
    threshold: u32,
}

impl Default for TransparencyMatte {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATTE_THRESHOLD,
        }
    }
}

impl TransparencyMatte {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Distinct in-bounds corner coordinates of a `width` x `height` image.
    pub fn seeds(width: u32, height: u32) -> Vec<(u32, u32)> {
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let mut seeds = vec![
            (0, 0),
            (width - 1, 0),
            (0, height - 1),
            (width - 1, height - 1),
        ];
        seeds.sort_unstable();
        seeds.dedup();
        seeds
    }

    /// Matte `input` and return a new image.
    ///
    /// When no corner has a neighbour within the threshold, every corner is
    /// taken to be foreground: the returned image is an unchanged copy and
    /// a `DegenerateSeed` warning is reported.
    pub fn apply(&self, input: &RgbaImage) -> Matte {
        let (width, height) = input.dimensions();
        let seeds = Self::seeds(width, height);
        let mut report = Report::new();

        if !seeds.iter().any(|&(x, y)| self.admits_neighbour(input, x, y)) {
            report.push(
                Diagnostic::warning(
                    DiagnosticKind::DegenerateSeed { seeds: seeds.len() },
                    "Flood fill could not grow from any corner; image left unchanged",
                )
                .with_help("Corners look like foreground; raise --threshold or crop a background border"),
            );
            return Matte {
                image: input.clone(),
                cleared: 0,
                seeds: seeds.len(),
                report,
            };
        }

        let visited = self.fill(input, &seeds);
        let reached: Vec<usize> = visited
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| v.then_some(i))
            .collect();

        let mut output = input.clone();
        for &i in &reached {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            output.get_pixel_mut(x, y)[3] = 0;
        }

        if reached.len() == visited.len() {
            report.push(
                Diagnostic::warning(
                    DiagnosticKind::MatteClearedAll,
                    "Flood fill reached every pixel; the output is fully transparent",
                )
                .with_help("Lower --threshold so the fill stops at sprite edges"),
            );
        }

        Matte {
            image: output,
            cleared: reached.len(),
            seeds: seeds.len(),
            report,
        }
    }

    /// Whether any 4-neighbour of `(x, y)` is close enough to join the fill.
    fn admits_neighbour(&self, input: &RgbaImage, x: u32, y: u32) -> bool {
        let (width, height) = input.dimensions();
        let here = Colour::from(input.get_pixel(x, y));
        neighbours(x, y, width, height).any(|(nx, ny)| {
            here.squared_rgb_distance(Colour::from(input.get_pixel(nx, ny))) < self.threshold
        })
    }

    /// Breadth-first fill; returns the visited bitmap in row-major order.
    fn fill(&self, input: &RgbaImage, seeds: &[(u32, u32)]) -> Vec<bool> {
        let (width, height) = input.dimensions();
        let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

        let mut visited = vec![false; width as usize * height as usize];
        let mut queue: VecDeque<(u32, u32)> = VecDeque::with_capacity(seeds.len());

        for &(x, y) in seeds {
            visited[index(x, y)] = true;
            queue.push_back((x, y));
        }

        while let Some((x, y)) = queue.pop_front() {
            let here = Colour::from(input.get_pixel(x, y));

            for (nx, ny) in neighbours(x, y, width, height) {
                let i = index(nx, ny);
                if visited[i] {
                    continue;
                }
                let there = Colour::from(input.get_pixel(nx, ny));
                if here.squared_rgb_distance(there) < self.threshold {
                    visited[i] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        visited
    }
}

/// In-bounds 4-neighbours of `(x, y)`.
fn neighbours(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    [
        (x.checked_sub(1), Some(y)),
        (x.checked_add(1).filter(|&nx| nx < width), Some(y)),
        (Some(x), y.checked_sub(1)),
        (Some(x), y.checked_add(1).filter(|&ny| ny < height)),
    ]
    .into_iter()
    .filter_map(|(nx, ny)| Some((nx?, ny?)))
}
