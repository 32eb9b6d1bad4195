//! Configuration schema types for `spritecut.toml`
//!
//! Every section is optional; missing keys fall back to the defaults the
//! sample sheets were authored against.

use serde::{Deserialize, Serialize};

use crate::contour::ContourConfig;
use crate::mask::DEFAULT_BACKGROUND_THRESHOLD;
use crate::models::ClipSpec;
use crate::output::{DEFAULT_DEBUG_NAME, DEFAULT_DESCRIPTOR_NAME};

/// Uniform grid slicing section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSection {
    #[serde(default = "default_grid_rows")]
    pub rows: u32,
    #[serde(default = "default_grid_cols")]
    pub cols: u32,
    /// Clip names, one per grid row
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default = "default_grid_duration")]
    pub frame_duration_ms: u32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            rows: default_grid_rows(),
            cols: default_grid_cols(),
            types: Vec::new(),
            frame_duration_ms: default_grid_duration(),
        }
    }
}

fn default_grid_rows() -> u32 {
    3
}

fn default_grid_cols() -> u32 {
    3
}

fn default_grid_duration() -> u32 {
    200
}

/// Contour extraction section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContourSection {
    /// Rows of the grid used to order regions
    #[serde(default = "default_contour_rows")]
    pub rows: u32,
    /// Columns of the grid used to order regions
    #[serde(default = "default_contour_cols")]
    pub cols: u32,
    #[serde(default = "default_min_area")]
    pub min_area: u32,
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Kept wider than `u8` so out-of-range values reach validation
    #[serde(default = "default_background_threshold")]
    pub background_threshold: u32,
    #[serde(default)]
    pub alpha_threshold: u32,
    #[serde(default)]
    pub strict_layout: bool,
    #[serde(default = "default_contour_duration")]
    pub frame_duration_ms: u32,
    #[serde(default)]
    pub clips: ClipSpec,
}

impl Default for ContourSection {
    fn default() -> Self {
        Self {
            rows: default_contour_rows(),
            cols: default_contour_cols(),
            min_area: default_min_area(),
            padding: default_padding(),
            background_threshold: default_background_threshold(),
            alpha_threshold: 0,
            strict_layout: false,
            frame_duration_ms: default_contour_duration(),
            clips: ClipSpec::new(),
        }
    }
}

impl ContourSection {
    /// Extractor settings, with thresholds saturated to the `u8` range.
    ///
    /// Validated configs never saturate.
    pub fn extractor_config(&self) -> ContourConfig {
        ContourConfig {
            min_area: self.min_area,
            padding: self.padding,
            assumed_rows: self.rows,
            assumed_cols: self.cols,
            background_threshold: self.background_threshold.min(255) as u8,
            alpha_threshold: self.alpha_threshold.min(255) as u8,
            strict_layout: self.strict_layout,
        }
    }
}

fn default_contour_rows() -> u32 {
    4
}

fn default_contour_cols() -> u32 {
    3
}

fn default_min_area() -> u32 {
    100
}

fn default_padding() -> u32 {
    2
}

fn default_background_threshold() -> u32 {
    DEFAULT_BACKGROUND_THRESHOLD as u32
}

fn default_contour_duration() -> u32 {
    100
}

/// Output files section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Descriptor file name, placed next to the image
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Also write the debug visualization
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_debug_file_name")]
    pub debug_file_name: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            pretty: default_pretty(),
            debug: false,
            debug_file_name: default_debug_file_name(),
        }
    }
}

fn default_file_name() -> String {
    DEFAULT_DESCRIPTOR_NAME.to_string()
}

fn default_pretty() -> bool {
    true
}

fn default_debug_file_name() -> String {
    DEFAULT_DEBUG_NAME.to_string()
}

/// Root of `spritecut.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetConfig {
    #[serde(default)]
    pub grid: GridSection,
    #[serde(default)]
    pub contour: ContourSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "contour.rows")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "spritecut.toml: '{}' {}", self.field, self.message)
    }
}

impl SheetConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.grid.rows == 0 {
            push("grid.rows", "must be a positive integer".to_string());
        }
        if self.grid.cols == 0 {
            push("grid.cols", "must be a positive integer".to_string());
        }
        if self.grid.rows > 0 && self.grid.types.len() > self.grid.rows as usize {
            push(
                "grid.types",
                format!("has {} name(s) but the grid has {} row(s)", self.grid.types.len(), self.grid.rows),
            );
        }
        if self.grid.types.iter().any(|t| t.trim().is_empty()) {
            push("grid.types", "must not contain empty names".to_string());
        }

        if self.contour.rows == 0 {
            push("contour.rows", "must be a positive integer".to_string());
        }
        if self.contour.cols == 0 {
            push("contour.cols", "must be a positive integer".to_string());
        }
        if self.contour.background_threshold > 255 {
            push("contour.background_threshold", "must be between 0 and 255".to_string());
        }
        if self.contour.alpha_threshold > 255 {
            push("contour.alpha_threshold", "must be between 0 and 255".to_string());
        }
        for problem in self.contour.clips.problems() {
            push("contour.clips", problem);
        }

        if self.output.file_name.trim().is_empty() {
            push("output.file_name", "must be a non-empty string".to_string());
        }
        if self.output.debug_file_name.trim().is_empty() {
            push("output.debug_file_name", "must be a non-empty string".to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
