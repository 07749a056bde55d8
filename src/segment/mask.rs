//! Boolean content grid.

/// A `width` x `height` grid marking content (non-background) cells.
///
/// Cells are stored row-major. The grid is derived from an image on every
/// run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl ContentMask {
    /// Create an all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a mask from text rows, `#` marking content.
    ///
    /// Short rows are padded with background.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut mask = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Content flag at `(x, y)`; out-of-bounds reads as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[self.index(x, y)]
    }

    /// Set the content flag at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, content: bool) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = content;
        }
    }

    /// Number of content cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// True when the mask holds no content at all.
    pub fn is_blank(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
