//! Binary foreground masks.
//!
//! Sheets with an alpha channel are segmented on opacity. Sheets without one
//! are assumed to be dark sprites on a near-white background and are
//! segmented on luminance.

use crate::error::SheetError;
use crate::pixels::{luminance, PixelBuffer};

/// Default luminance cut-off: pixels brighter than this are background.
pub const DEFAULT_BACKGROUND_THRESHOLD: u8 = 250;

/// How foreground pixels were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSource {
    /// `alpha > alpha_threshold`
    Alpha,
    /// `luminance <= background_threshold`
    Luminance,
}

/// Thresholds used when deriving a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// Luminance at or below which an opaque-less pixel is foreground
    pub background_threshold: u8,
    /// Alpha above which a pixel is foreground
    pub alpha_threshold: u8,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self { background_threshold: DEFAULT_BACKGROUND_THRESHOLD, alpha_threshold: 0 }
    }
}

/// A width x height grid of foreground flags, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
    source: MaskSource,
}

impl ForegroundMask {
    /// Derive the foreground mask of `image`.
    ///
    /// Fails with `EmptyImage` for a zero-sized buffer and `DecodeFailure`
    /// for channel layouts other than RGB / RGBA.
    pub fn derive(image: &PixelBuffer, options: &MaskOptions) -> Result<Self, SheetError> {
        if image.is_empty() {
            return Err(SheetError::EmptyImage { width: image.width(), height: image.height() });
        }

        let (cells, source): (Vec<bool>, MaskSource) = match image.channels() {
            4 => (
                image.data().chunks_exact(4).map(|px| px[3] > options.alpha_threshold).collect(),
                MaskSource::Alpha,
            ),
            3 => (
                image
                    .data()
                    .chunks_exact(3)
                    .map(|px| luminance(px[0], px[1], px[2]) <= options.background_threshold)
                    .collect(),
                MaskSource::Luminance,
            ),
            n => {
                return Err(SheetError::decode(format!(
                    "expected 3 or 4 channels for segmentation, got {}",
                    n
                )))
            }
        };

        let mask = Self { width: image.width(), height: image.height(), cells, source };
        log::debug!(
            "derived {:?} mask {}x{} with {} foreground pixel(s)",
            source,
            mask.width,
            mask.height,
            mask.count()
        );
        Ok(mask)
    }

    /// Build a mask from text rows, `#` marking foreground.
    ///
    /// Short rows are padded with background. Handy for tests and benches.
    ///
    /// ```
    /// use spritecut::mask::ForegroundMask;
    ///
    /// let mask = ForegroundMask::from_rows(&["#.", ".#"]);
    /// assert!(mask.get(0, 0));
    /// assert!(!mask.get(1, 0));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut cells = vec![false; width as usize * height as usize];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                cells[y * width as usize + x] = ch == '#';
            }
        }
        Self { width, height, cells, source: MaskSource::Alpha }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source(&self) -> MaskSource {
        self.source
    }

    /// Foreground flag at (x, y); out-of-bounds reads are background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.cells[self.index(x, y)]
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub(crate) fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
