//! Debug visualization of detected frames.
//!
//! Draws each frame's outline and index onto a copy of the sheet so a human
//! can check the detection. Output is diagnostic only; callers treat a
//! failure here as a warning, never as a failed extraction.

use thiserror::Error;

use crate::models::FrameRecord;
use crate::pixels::PixelBuffer;

/// Outline and label colour (green).
pub const DEBUG_COLOR: [u8; 3] = [0, 255, 0];

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// 5x7 digit glyphs, one byte per row, bit 4 is the leftmost column.
const DIGIT_GLYPHS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

/// Error from debug rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebugRenderError {
    #[error("Debug rendering supports 3 or 4 channels, got {0}")]
    UnsupportedChannels(u8),
}

/// Drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugStyle {
    pub color: [u8; 3],
    /// Integer scale of the digit glyphs
    pub label_scale: u32,
}

impl Default for DebugStyle {
    fn default() -> Self {
        Self { color: DEBUG_COLOR, label_scale: 1 }
    }
}

/// Outline every frame and label it with its index, on a copy of `image`.
pub fn render(image: &PixelBuffer, frames: &[FrameRecord]) -> Result<PixelBuffer, DebugRenderError> {
    render_with_style(image, frames, &DebugStyle::default())
}

/// [`render`] with explicit colours and label size.
pub fn render_with_style(
    image: &PixelBuffer,
    frames: &[FrameRecord],
    style: &DebugStyle,
) -> Result<PixelBuffer, DebugRenderError> {
    if !matches!(image.channels(), 3 | 4) {
        return Err(DebugRenderError::UnsupportedChannels(image.channels()));
    }

    let mut canvas = image.clone();
    for frame in frames {
        draw_outline(&mut canvas, frame, style.color);
        draw_label(&mut canvas, frame, style);
    }
    Ok(canvas)
}

fn draw_outline(canvas: &mut PixelBuffer, frame: &FrameRecord, color: [u8; 3]) {
    let r = frame.rect;
    if r.width == 0 || r.height == 0 {
        return;
    }
    let (right, bottom) = (r.right() - 1, r.bottom() - 1);
    for x in r.x..=right {
        put(canvas, x as i64, r.y as i64, color);
        put(canvas, x as i64, bottom as i64, color);
    }
    for y in r.y..=bottom {
        put(canvas, r.x as i64, y as i64, color);
        put(canvas, right as i64, y as i64, color);
    }
}

/// Index label above the top-left corner with one blank row between the
/// glyphs and the outline, or just inside the box when the frame touches the
/// top of the sheet.
fn draw_label(canvas: &mut PixelBuffer, frame: &FrameRecord, style: &DebugStyle) {
    let scale = style.label_scale.max(1) as i64;
    let glyph_h = GLYPH_HEIGHT as i64 * scale;
    let r = frame.rect;

    let (origin_x, origin_y) = if r.y as i64 >= glyph_h + 1 {
        (r.x as i64, r.y as i64 - glyph_h - 1)
    } else {
        (r.x as i64 + 2, r.y as i64 + 2)
    };

    let advance = (GLYPH_WIDTH as i64 + 1) * scale;
    for (i, digit) in frame.index.to_string().bytes().enumerate() {
        let glyph = &DIGIT_GLYPHS[(digit - b'0') as usize];
        draw_glyph(canvas, glyph, origin_x + i as i64 * advance, origin_y, scale, style.color);
    }
}

fn draw_glyph(canvas: &mut PixelBuffer, glyph: &[u8; 7], x0: i64, y0: i64, scale: i64, color: [u8; 3]) {
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    put(canvas, x0 + col as i64 * scale + sx, y0 + row as i64 * scale + sy, color);
                }
            }
        }
    }
}

/// Write an opaque pixel, ignoring coordinates outside the canvas.
fn put(canvas: &mut PixelBuffer, x: i64, y: i64, color: [u8; 3]) {
    if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
        return;
    }
    if let Some(px) = canvas.pixel_mut(x as u32, y as u32) {
        px[..3].copy_from_slice(&color);
        if px.len() == 4 {
            px[3] = 255;
        }
    }
}
