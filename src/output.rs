//! PNG output and file path generation

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::io;
use std::path::{Path, PathBuf};

use crate::pixels::PixelBuffer;

/// Default descriptor file name, written next to the sheet.
pub const DEFAULT_DESCRIPTOR_NAME: &str = "animation.json";

/// Default debug visualization file name, written next to the sheet.
pub const DEFAULT_DEBUG_NAME: &str = "sprite_detection_debug.png";

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// Channel layout PNG cannot hold
    UnsupportedChannels(u8),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::UnsupportedChannels(n) => {
                write!(f, "Cannot encode {} channel(s) as PNG", n)
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::UnsupportedChannels(_) => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Encode a pixel buffer as PNG bytes.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, OutputError> {
    let color = match buffer.channels() {
        1 => ColorType::L8,
        2 => ColorType::La8,
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        n => return Err(OutputError::UnsupportedChannels(n)),
    };
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(buffer.data(), buffer.width(), buffer.height(), color)?;
    Ok(bytes)
}

/// Save a pixel buffer to a PNG file.
///
/// # Arguments
///
/// * `buffer` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<(), OutputError> {
    let bytes = encode_png(buffer)?;

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, bytes)?;
    Ok(())
}

/// Path of a file placed alongside the sheet image.
///
/// # Output Naming Rules
///
/// | Scenario | Output |
/// |----------|--------|
/// | `assets/fish/fish.png`, `animation.json` | `assets/fish/animation.json` |
/// | `fish.png`, `animation.json` | `animation.json` |
/// | `fish.png`, `out/anim.json` | `out/anim.json` (absolute or relative paths with a directory are kept) |
pub fn sibling_path(image: &Path, file_name: &str) -> PathBuf {
    let requested = Path::new(file_name);
    if requested.is_absolute() || requested.components().count() > 1 {
        return requested.to_path_buf();
    }
    match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
