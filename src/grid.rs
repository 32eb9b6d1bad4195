//! Fixed-grid slicing for sheets with a known layout.
//!
//! Rows are sprite "types", columns are the frames of each type. Frame size
//! is `floor(width / cols) x floor(height / rows)`; remainder pixels on the
//! right and bottom edges belong to no frame.

use crate::error::SheetError;
use crate::models::{FrameRecord, GridFrames, Rect};
use crate::pixels::PixelBuffer;

/// Slice `image` into `rows` x `cols` equal frames, indexed row-major.
///
/// # Examples
///
/// ```
/// use spritecut::grid::slice;
/// use spritecut::pixels::PixelBuffer;
///
/// let sheet = PixelBuffer::filled(300, 400, &[0, 0, 0]).unwrap();
/// let grid = slice(&sheet, 3, 3).unwrap();
/// assert_eq!(grid.frames.len(), 9);
/// assert_eq!((grid.frame_width, grid.frame_height), (100, 133));
/// ```
pub fn slice(image: &PixelBuffer, rows: u32, cols: u32) -> Result<GridFrames, SheetError> {
    slice_dimensions(image.width(), image.height(), rows, cols)
}

/// Slice by dimensions alone; the grid never looks at pixel values.
pub fn slice_dimensions(
    width: u32,
    height: u32,
    rows: u32,
    cols: u32,
) -> Result<GridFrames, SheetError> {
    if rows == 0 || cols == 0 {
        return Err(SheetError::invalid_layout(format!(
            "grid needs at least 1 row and 1 column, got {}x{}",
            rows, cols
        )));
    }
    if width == 0 || height == 0 {
        return Err(SheetError::EmptyImage { width, height });
    }

    let frame_width = width / cols;
    let frame_height = height / rows;
    if frame_width == 0 || frame_height == 0 {
        return Err(SheetError::invalid_layout(format!(
            "{}x{} grid on a {}x{} image leaves zero-sized frames",
            rows, cols, width, height
        )));
    }

    let remainder = (width % cols, height % rows);
    if remainder != (0, 0) {
        log::debug!(
            "grid {}x{} on {}x{} drops {}px right and {}px bottom",
            rows,
            cols,
            width,
            height,
            remainder.0,
            remainder.1
        );
    }

    let frames = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .enumerate()
        .map(|(index, (row, col))| {
            FrameRecord::new(
                index,
                Rect::new(col * frame_width, row * frame_height, frame_width, frame_height),
            )
        })
        .collect();

    Ok(GridFrames { rows, cols, frame_width, frame_height, frames })
}
