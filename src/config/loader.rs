//! Configuration loading and discovery for `spritecut.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SheetConfig;
use crate::models::ClipSpec;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up next to sheets.
pub const CONFIG_FILE_NAME: &str = "spritecut.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse spritecut.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Grid row count
    pub grid_rows: Option<u32>,
    pub grid_cols: Option<u32>,
    pub types: Option<Vec<String>>,
    pub grid_duration: Option<u32>,
    pub contour_rows: Option<u32>,
    pub contour_cols: Option<u32>,
    pub min_area: Option<u32>,
    pub padding: Option<u32>,
    pub background_threshold: Option<u32>,
    pub alpha_threshold: Option<u32>,
    pub clips: Option<ClipSpec>,
    pub strict_layout: Option<bool>,
    pub contour_duration: Option<u32>,
    /// Descriptor file name
    pub output: Option<String>,
    pub debug: Option<bool>,
    pub pretty: Option<bool>,
}

/// Find spritecut.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Find the config governing a sheet, starting at the image's directory.
pub fn find_config_for_image(image: &Path) -> Option<PathBuf> {
    let dir = match image.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    find_config_from(dir)
}

/// Load configuration for a sheet.
///
/// An explicit `path` must exist. Otherwise the config is discovered from
/// the image's directory; no file at all means defaults.
///
/// # Example
/// ```ignore
/// let config = load_config(None, Path::new("assets/fish.png"))?;
/// ```
pub fn load_config(path: Option<&Path>, image: &Path) -> Result<SheetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_for_image(image),
    };

    match config_path {
        Some(p) => {
            log::debug!("Loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(SheetConfig::default()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<SheetConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SheetConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

/// Turn validation problems into a [`ConfigError::Validation`].
pub fn check(config: &SheetConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Callers re-run
/// [`check`] afterwards since overrides may be out of range.
pub fn merge_cli_overrides(config: &mut SheetConfig, overrides: &CliOverrides) {
    if let Some(rows) = overrides.grid_rows {
        config.grid.rows = rows;
    }
    if let Some(cols) = overrides.grid_cols {
        config.grid.cols = cols;
    }
    if let Some(ref types) = overrides.types {
        config.grid.types = types.clone();
    }
    if let Some(duration) = overrides.grid_duration {
        config.grid.frame_duration_ms = duration;
    }

    if let Some(rows) = overrides.contour_rows {
        config.contour.rows = rows;
    }
    if let Some(cols) = overrides.contour_cols {
        config.contour.cols = cols;
    }
    if let Some(min_area) = overrides.min_area {
        config.contour.min_area = min_area;
    }
    if let Some(padding) = overrides.padding {
        config.contour.padding = padding;
    }
    if let Some(threshold) = overrides.background_threshold {
        config.contour.background_threshold = threshold;
    }
    if let Some(threshold) = overrides.alpha_threshold {
        config.contour.alpha_threshold = threshold;
    }
    if let Some(ref clips) = overrides.clips {
        config.contour.clips = clips.clone();
    }
    if let Some(strict) = overrides.strict_layout {
        config.contour.strict_layout = strict;
    }
    if let Some(duration) = overrides.contour_duration {
        config.contour.frame_duration_ms = duration;
    }

    if let Some(ref output) = overrides.output {
        config.output.file_name = output.clone();
    }
    if let Some(debug) = overrides.debug {
        config.output.debug = debug;
    }
    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }
}
