//! Contour-based frame extraction for irregular sprite sheets.
//!
//! Frames are found as connected foreground regions of a [`ForegroundMask`].
//! Because scan order says nothing about where a sprite sits visually, each
//! region is dropped into a coarse `(row, col)` bucket of an assumed grid and
//! the regions are stably sorted on that bucket.
//!
//! The assumed grid is an input, not something inferred from the mask. When
//! the sheet holds a different number of sprites the order is still
//! deterministic, just not necessarily the visual one.

use crate::error::SheetError;
use crate::mask::{ForegroundMask, MaskOptions, DEFAULT_BACKGROUND_THRESHOLD};
use crate::models::{FrameRecord, Rect};
use crate::pixels::PixelBuffer;

/// Parameters for a single contour extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourConfig {
    /// Regions with fewer foreground pixels than this are discarded
    pub min_area: u32,
    /// Margin added on every side of a region's bounding box
    pub padding: u32,
    /// Rows of the grid used for ordering
    pub assumed_rows: u32,
    /// Columns of the grid used for ordering
    pub assumed_cols: u32,
    /// Luminance cut-off for sheets without alpha
    pub background_threshold: u8,
    /// Alpha cut-off for sheets with alpha
    pub alpha_threshold: u8,
    /// Reject sheets whose region count differs from rows x cols
    pub strict_layout: bool,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            min_area: 100,
            padding: 2,
            assumed_rows: 4,
            assumed_cols: 3,
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
            alpha_threshold: 0,
            strict_layout: false,
        }
    }
}

impl ContourConfig {
    pub fn mask_options(&self) -> MaskOptions {
        MaskOptions {
            background_threshold: self.background_threshold,
            alpha_threshold: self.alpha_threshold,
        }
    }
}

/// A maximal connected foreground region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Tight bounding box, before padding
    pub bounds: Rect,
    /// Foreground pixel count
    pub area: usize,
}

/// Coarse grid cell a region's centre falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridBucket {
    pub row: u32,
    pub col: u32,
}

impl GridBucket {
    /// Row-major sort key, `row * cols + col`.
    pub fn key(&self, cols: u32) -> u64 {
        self.row as u64 * cols as u64 + self.col as u64
    }
}

/// Bucket of a point on an image of `image_size`, split into `rows` x `cols`
/// equal cells.
///
/// Cell size is computed in floating point, so sheets that are not an exact
/// multiple of the grid still bucket sensibly; indices are clamped to the
/// last row/column. `rows` and `cols` must be non-zero.
///
/// ```
/// use spritecut::contour::{grid_bucket, GridBucket};
///
/// let b = grid_bucket((250.0, 10.0), (300, 400), 4, 3);
/// assert_eq!(b, GridBucket { row: 0, col: 2 });
/// ```
pub fn grid_bucket(center: (f64, f64), image_size: (u32, u32), rows: u32, cols: u32) -> GridBucket {
    let cell_w = image_size.0 as f64 / cols as f64;
    let cell_h = image_size.1 as f64 / rows as f64;
    let col = (center.0 / cell_w).floor().max(0.0) as u32;
    let row = (center.1 / cell_h).floor().max(0.0) as u32;
    GridBucket { row: row.min(rows.saturating_sub(1)), col: col.min(cols.saturating_sub(1)) }
}

/// Find the external connected regions of `mask`, in raster-scan order of
/// their first pixel.
///
/// Foreground is 8-connected and background 4-connected. A region sitting
/// inside a hole of another region is not reported on its own; the enclosing
/// region's bounding box already covers it.
pub fn find_regions(mask: &ForegroundMask) -> Vec<Region> {
    let (width, height) = (mask.width() as usize, mask.height() as usize);
    let cells = mask.cells();
    let outside = outside_background(mask);
    let mut visited = vec![false; cells.len()];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for start in 0..cells.len() {
        if !cells[start] || visited[start] {
            continue;
        }

        visited[start] = true;
        stack.push(start);
        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);
        let mut area = 0usize;
        let mut external = false;

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % width, idx / width);
            area += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    let in_bounds = nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height;
                    let orthogonal = dx == 0 || dy == 0;

                    if !in_bounds {
                        if orthogonal {
                            external = true;
                        }
                        continue;
                    }

                    let nidx = ny as usize * width + nx as usize;
                    if cells[nidx] {
                        if !visited[nidx] {
                            visited[nidx] = true;
                            stack.push(nidx);
                        }
                    } else if orthogonal && outside[nidx] {
                        external = true;
                    }
                }
            }
        }

        if external {
            regions.push(Region {
                bounds: Rect::new(
                    min_x as u32,
                    min_y as u32,
                    (max_x - min_x + 1) as u32,
                    (max_y - min_y + 1) as u32,
                ),
                area,
            });
        }
    }

    regions
}

/// Background pixels 4-connected to the image border.
fn outside_background(mask: &ForegroundMask) -> Vec<bool> {
    let (width, height) = (mask.width() as usize, mask.height() as usize);
    let cells = mask.cells();
    let mut outside = vec![false; cells.len()];
    if width == 0 || height == 0 {
        return outside;
    }
    let mut stack = Vec::new();

    let seed = |idx: usize, outside: &mut Vec<bool>, stack: &mut Vec<usize>| {
        if !cells[idx] && !outside[idx] {
            outside[idx] = true;
            stack.push(idx);
        }
    };

    for x in 0..width {
        seed(x, &mut outside, &mut stack);
        seed((height - 1) * width + x, &mut outside, &mut stack);
    }
    for y in 0..height {
        seed(y * width, &mut outside, &mut stack);
        seed(y * width + width - 1, &mut outside, &mut stack);
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % width, idx / width);
        let neighbors: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        for (dx, dy) in &neighbors {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx >= 0 && (nx as usize) < width && ny >= 0 && (ny as usize) < height {
                let nidx = ny as usize * width + nx as usize;
                if !cells[nidx] && !outside[nidx] {
                    outside[nidx] = true;
                    stack.push(nidx);
                }
            }
        }
    }

    outside
}

/// Stable-sort regions into row-major bucket order.
///
/// Regions sharing a bucket keep their detection order.
pub fn order_regions(regions: &mut [Region], image_size: (u32, u32), rows: u32, cols: u32) {
    regions.sort_by_key(|r| grid_bucket(r.bounds.center(), image_size, rows, cols).key(cols));
}

/// Extract ordered frames from a sprite sheet.
pub fn extract(image: &PixelBuffer, config: &ContourConfig) -> Result<Vec<FrameRecord>, SheetError> {
    check_assumed_grid(config)?;
    let mask = ForegroundMask::derive(image, &config.mask_options())?;
    extract_from_mask(&mask, config)
}

/// Extract ordered frames from an already derived mask.
pub fn extract_from_mask(
    mask: &ForegroundMask,
    config: &ContourConfig,
) -> Result<Vec<FrameRecord>, SheetError> {
    check_assumed_grid(config)?;
    if mask.width() == 0 || mask.height() == 0 {
        return Err(SheetError::EmptyImage { width: mask.width(), height: mask.height() });
    }

    let detected = find_regions(mask);
    let detected_count = detected.len();
    let mut regions: Vec<Region> =
        detected.into_iter().filter(|r| r.area >= config.min_area as usize).collect();
    log::debug!(
        "{} region(s) detected, {} kept with area >= {}",
        detected_count,
        regions.len(),
        config.min_area
    );

    if regions.is_empty() {
        return Err(SheetError::NoRegionsFound { detected: detected_count, min_area: config.min_area });
    }

    let expected = config.assumed_rows as usize * config.assumed_cols as usize;
    if regions.len() != expected {
        if config.strict_layout {
            return Err(SheetError::LayoutMismatch { expected, found: regions.len() });
        }
        log::warn!(
            "found {} region(s) but the assumed {}x{} grid holds {}; frame order may not match the sheet",
            regions.len(),
            config.assumed_rows,
            config.assumed_cols,
            expected
        );
    }

    let bounds = (mask.width(), mask.height());
    order_regions(&mut regions, bounds, config.assumed_rows, config.assumed_cols);

    Ok(regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let rect = region.bounds.padded(config.padding, bounds).unwrap_or(region.bounds);
            FrameRecord::new(index, rect)
        })
        .collect())
}

fn check_assumed_grid(config: &ContourConfig) -> Result<(), SheetError> {
    if config.assumed_rows == 0 || config.assumed_cols == 0 {
        return Err(SheetError::invalid_layout(format!(
            "assumed grid must be at least 1x1, got {}x{}",
            config.assumed_rows, config.assumed_cols
        )));
    }
    Ok(())
}
