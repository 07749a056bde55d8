//! Two-pass connected-component labeling.
//!
//! The first pass walks the mask in raster order and gives each content
//! cell a provisional label taken from its left or top neighbour (the only
//! neighbours already visited), recording equivalences in a
//! [`DisjointSet`] whenever the two disagree. The second pass resolves every
//! cell to its root and accumulates per-root bounds and cell counts.
//! Connectivity is 4-way.

use std::collections::BTreeMap;

use crate::report::ComponentSummary;
use crate::types::BoundingBox;

use super::{ContentMask, DisjointSet};

/// A connected blob of content cells, in labeling-grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Root label; the smallest provisional label in the blob.
    pub id: u32,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
    pub pixel_count: u32,
}

impl Component {
    fn seed(id: u32, x: u32, y: u32) -> Self {
        Self {
            id,
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
            pixel_count: 0,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.pixel_count += 1;
    }

    /// Bounding box width in grid cells.
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Bounding box height in grid cells.
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Approximate full-resolution pixel area for a grid labeled at `factor`.
    pub fn estimated_area(&self, factor: u32) -> u64 {
        u64::from(self.pixel_count) * u64::from(factor) * u64::from(factor)
    }

    /// Unpadded bounds scaled back up by `factor`.
    pub fn full_res_bounds(&self, factor: u32) -> BoundingBox {
        BoundingBox::new(
            self.min_x * factor,
            self.min_y * factor,
            self.width() * factor,
            self.height() * factor,
        )
    }

    pub fn summary(&self, factor: u32) -> ComponentSummary {
        ComponentSummary {
            id: self.id,
            pixel_count: self.pixel_count,
            bounds: self.full_res_bounds(factor),
        }
    }
}

/// Result of labeling a mask.
#[derive(Debug, Clone)]
pub struct Labeling {
    width: u32,
    height: u32,
    roots: Vec<u32>,
    components: Vec<Component>,
    provisional: usize,
}

impl Labeling {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resolved root label at `(x, y)`, or 0 for background.
    pub fn root_at(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.roots[y as usize * self.width as usize + x as usize]
    }

    /// Components ordered by root label.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn into_components(self) -> Vec<Component> {
        self.components
    }

    /// Number of provisional labels issued by the first pass.
    pub fn provisional_labels(&self) -> usize {
        self.provisional
    }
}

/// Label the 4-connected components of `mask`.
pub fn label_components(mask: &ContentMask) -> Labeling {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let cells = mask.cells();

    let mut labels = vec![0u32; width * height];
    let mut sets = DisjointSet::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if !cells[idx] {
                continue;
            }

            let left = if x > 0 { labels[idx - 1] } else { 0 };
            let top = if y > 0 { labels[idx - width] } else { 0 };

            labels[idx] = match (left, top) {
                (0, 0) => sets.make_set(),
                (l, 0) => l,
                (0, t) => t,
                (l, t) => {
                    if l != t {
                        sets.union(l, t);
                    }
                    l
                }
            };
        }
    }

    let mut components: BTreeMap<u32, Component> = BTreeMap::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let label = labels[idx];
            if label == 0 {
                continue;
            }
            let root = sets.find(label);
            labels[idx] = root;

            let (cx, cy) = (x as u32, y as u32);
            components
                .entry(root)
                .or_insert_with(|| Component::seed(root, cx, cy))
                .include(cx, cy);
        }
    }

    Labeling {
        width: mask.width(),
        height: mask.height(),
        roots: labels,
        components: components.into_values().collect(),
        provisional: sets.len(),
    }
}
