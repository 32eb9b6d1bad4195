//! Error types for sheet extraction and descriptor building

use thiserror::Error;

/// Failure of a single extraction or building call.
///
/// Every variant is terminal for the call that produced it. Messages name the
/// offending parameter so callers can report it without extra context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// The pixel data could not be interpreted (bad encoding, channel count, size)
    #[error("Cannot decode image: {reason}")]
    DecodeFailure { reason: String },

    /// The image has no pixels to work with
    #[error("Image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Grid shape is unusable for this image
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },

    /// Every connected region was discarded by the minimum area filter
    #[error("No regions found: {detected} region(s) detected, none with area >= {min_area}")]
    NoRegionsFound { detected: usize, min_area: u32 },

    /// A clip references a frame index that does not exist
    #[error("Clip '{clip}' references frame {index}, but only {frame_count} frame(s) exist")]
    InvalidClipReference { clip: String, index: usize, frame_count: usize },

    /// A clip has no frames
    #[error("Clip '{clip}' has no frames")]
    EmptyClip { clip: String },

    /// Two clips share a name
    #[error("Clip '{clip}' is defined more than once")]
    DuplicateClip { clip: String },

    /// The builder was handed an empty frame list
    #[error("Cannot build a descriptor from zero frames")]
    NoFrames,

    /// Strict contour mode: detected count differs from rows x cols
    #[error("Layout mismatch: expected {expected} region(s) from the assumed grid, found {found}")]
    LayoutMismatch { expected: usize, found: usize },
}

impl SheetError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SheetError::DecodeFailure { .. } => "decode_failure",
            SheetError::EmptyImage { .. } => "empty_image",
            SheetError::InvalidLayout { .. } => "invalid_layout",
            SheetError::NoRegionsFound { .. } => "no_regions_found",
            SheetError::InvalidClipReference { .. } => "invalid_clip_reference",
            SheetError::EmptyClip { .. } => "empty_clip",
            SheetError::DuplicateClip { .. } => "duplicate_clip",
            SheetError::NoFrames => "no_frames",
            SheetError::LayoutMismatch { .. } => "layout_mismatch",
        }
    }

    pub(crate) fn invalid_layout(reason: impl Into<String>) -> Self {
        SheetError::InvalidLayout { reason: reason.into() }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        SheetError::DecodeFailure { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_reference_message_names_clip_and_index() {
        let err = SheetError::InvalidClipReference {
            clip: "swim_left".to_string(),
            index: 5,
            frame_count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("swim_left"));
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
        assert_eq!(err.kind(), "invalid_clip_reference");
    }

    #[test]
    fn test_no_regions_message() {
        let err = SheetError::NoRegionsFound { detected: 4, min_area: 100 };
        assert_eq!(
            err.to_string(),
            "No regions found: 4 region(s) detected, none with area >= 100"
        );
    }

    #[test]
    fn test_empty_image_message() {
        let err = SheetError::EmptyImage { width: 0, height: 12 };
        assert!(err.to_string().contains("0x12"));
        assert_eq!(err.kind(), "empty_image");
    }
}
