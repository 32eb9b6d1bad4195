//! Frame geometry types.

use serde::{Deserialize, Serialize};

/// An axis-aligned frame rectangle in pixel coordinates.
///
/// Rectangles produced by extraction always satisfy `width > 0`, `height > 0`
/// and lie inside the source image; [`Rect::clamped`] enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from possibly out-of-range signed edges, clamped to
    /// an image of `bounds` (width, height).
    ///
    /// Returns `None` when nothing of the rectangle remains inside the image.
    ///
    /// # Examples
    ///
    /// ```
    /// use spritecut::models::Rect;
    ///
    /// let r = Rect::clamped(-2, -2, 10, 10, (6, 6)).unwrap();
    /// assert_eq!(r, Rect::new(0, 0, 6, 6));
    /// assert!(Rect::clamped(8, 0, 4, 4, (6, 6)).is_none());
    /// ```
    pub fn clamped(x: i64, y: i64, width: i64, height: i64, bounds: (u32, u32)) -> Option<Self> {
        let (max_w, max_h) = (bounds.0 as i64, bounds.1 as i64);
        let left = x.clamp(0, max_w);
        let top = y.clamp(0, max_h);
        let right = (x + width).clamp(0, max_w);
        let bottom = (y + height).clamp(0, max_h);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    /// Grow the rectangle by `padding` on every side, clamped to `bounds`.
    pub fn padded(&self, padding: u32, bounds: (u32, u32)) -> Option<Self> {
        let pad = padding as i64;
        Self::clamped(
            self.x as i64 - pad,
            self.y as i64 - pad,
            self.width as i64 + 2 * pad,
            self.height as i64 + 2 * pad,
            bounds,
        )
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Centre point in floating-point pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when the rectangle lies fully inside an image of `bounds`.
    pub fn fits_within(&self, bounds: (u32, u32)) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() as u64 <= bounds.0 as u64
            && self.bottom() as u64 <= bounds.1 as u64
    }
}

/// A frame rectangle together with its position in the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    pub index: usize,
    pub rect: Rect,
}

impl FrameRecord {
    pub fn new(index: usize, rect: Rect) -> Self {
        Self { index, rect }
    }
}

/// Frames of a fixed R x C grid, indexed row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrames {
    pub rows: u32,
    pub cols: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frames: Vec<FrameRecord>,
}

impl GridFrames {
    /// Frame indices of one grid row ("type"), left to right.
    pub fn row_indices(&self, row: u32) -> Vec<usize> {
        let start = (row * self.cols) as usize;
        (start..start + self.cols as usize).collect()
    }
}

/// Output of either extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSet {
    /// Known regular grid, one row per type
    Grid(GridFrames),
    /// Regions detected in the foreground mask, in bucket order
    Contour(Vec<FrameRecord>),
}

impl FrameSet {
    pub fn frames(&self) -> &[FrameRecord] {
        match self {
            FrameSet::Grid(grid) => &grid.frames,
            FrameSet::Contour(frames) => frames,
        }
    }

    pub fn len(&self) -> usize {
        self.frames().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }
}
