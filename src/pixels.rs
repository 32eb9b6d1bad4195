//! In-memory pixel buffers and the decode side of the imaging collaborator
//!
//! Extraction only ever borrows a [`PixelBuffer`] read-only. Decoding from
//! encoded bytes is delegated to the `image` crate.

use image::{DynamicImage, GenericImageView};

use crate::error::SheetError;

/// An interleaved 8-bit pixel grid.
///
/// Rows are stored top to bottom, pixels left to right, `channels` bytes per
/// pixel. Extraction understands 3 (RGB) and 4 (RGBA) channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved bytes.
    ///
    /// Fails with `DecodeFailure` when the byte count does not match
    /// `width * height * channels` or the channel count is outside 1..=4.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, SheetError> {
        if !(1..=4).contains(&channels) {
            return Err(SheetError::decode(format!("unsupported channel count {}", channels)));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| SheetError::decode(format!("image size {}x{} overflows", width, height)))?;
        if data.len() != expected {
            return Err(SheetError::decode(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            )));
        }
        Ok(Self { width, height, channels, data })
    }

    /// A buffer where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self, SheetError> {
        let channels = u8::try_from(pixel.len())
            .map_err(|_| SheetError::decode(format!("unsupported channel count {}", pixel.len())))?;
        let count = width as usize * height as usize;
        let data = pixel.iter().copied().cycle().take(count * pixel.len()).collect();
        Self::from_raw(width, height, channels, data)
    }

    /// Convert a decoded image, keeping alpha only when the source has it.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        if image.color().has_alpha() {
            Self { width, height, channels: 4, data: image.to_rgba8().into_raw() }
        } else {
            Self { width, height, channels: 3, data: image.to_rgb8().into_raw() }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Channel bytes of the pixel at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data[start..start + self.channels as usize])
    }

    pub(crate) fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        let channels = self.channels as usize;
        Some(&mut self.data[start..start + channels])
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a [`PixelBuffer`].
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, SheetError> {
    let image = image::load_from_memory(bytes).map_err(|e| SheetError::decode(e.to_string()))?;
    Ok(PixelBuffer::from_dynamic(&image))
}

/// BT.601 luma of an 8-bit RGB triple, rounded to the nearest integer.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    ((weighted + 500) / 1000) as u8
}
