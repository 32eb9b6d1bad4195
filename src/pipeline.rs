//! Sheet processing pipeline.
//!
//! Reads a sheet from disk, extracts frames in grid or contour mode, builds
//! the descriptor and writes it next to the image. The debug visualization
//! is an isolated post-step: its failure is logged and reported as a
//! warning, never as a failed run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::animation::AnimationDescriptorBuilder;
use crate::config::SheetConfig;
use crate::contour::{self, ContourConfig};
use crate::debug;
use crate::error::SheetError;
use crate::export::{ExportError, ExportOptions, JsonExporter};
use crate::grid;
use crate::models::{AnimationDescriptor, ClipLayout, ClipSpec, FrameSet};
use crate::output::{self, DEFAULT_DEBUG_NAME, DEFAULT_DESCRIPTOR_NAME};
use crate::pixels::{self, PixelBuffer};

/// Uniform grid slicing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    pub rows: u32,
    pub cols: u32,
    /// One clip name per row; missing names become `type_<row>`
    pub types: Vec<String>,
    pub frame_duration_ms: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        SheetConfig::default().grid_options()
    }
}

/// Contour extraction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourOptions {
    pub extractor: ContourConfig,
    /// Empty means a single clip over every frame
    pub clips: ClipSpec,
    pub frame_duration_ms: u32,
}

impl Default for ContourOptions {
    fn default() -> Self {
        SheetConfig::default().contour_options()
    }
}

/// Extraction strategy for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Grid(GridOptions),
    Contour(ContourOptions),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Grid(_) => "grid",
            Mode::Contour(_) => "contour",
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Descriptor file name, resolved next to the image
    pub file_name: String,
    pub pretty: bool,
    pub debug: bool,
    pub debug_file_name: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_DESCRIPTOR_NAME.to_string(),
            pretty: true,
            debug: false,
            debug_file_name: DEFAULT_DEBUG_NAME.to_string(),
        }
    }
}

/// Everything a single run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: Mode,
    pub output: OutputOptions,
}

impl RunOptions {
    pub fn new(mode: Mode) -> Self {
        Self { mode, output: OutputOptions::default() }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }
}

impl SheetConfig {
    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            rows: self.grid.rows,
            cols: self.grid.cols,
            types: self.grid.types.clone(),
            frame_duration_ms: self.grid.frame_duration_ms,
        }
    }

    pub fn contour_options(&self) -> ContourOptions {
        ContourOptions {
            extractor: self.contour.extractor_config(),
            clips: self.contour.clips.clone(),
            frame_duration_ms: self.contour.frame_duration_ms,
        }
    }

    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            file_name: self.output.file_name.clone(),
            pretty: self.output.pretty,
            debug: self.output.debug,
            debug_file_name: self.output.debug_file_name.clone(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub layout: ClipLayout,
    pub frame_count: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub clip_names: Vec<String>,
    pub descriptor_path: PathBuf,
    /// Set only when the debug image was actually written
    pub debug_path: Option<PathBuf>,
    /// Non-fatal problems (debug rendering)
    pub warnings: Vec<String>,
    pub duration: Duration,
}

/// Failure of a run. Nothing has been written when one of these is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Sheet {
        path: PathBuf,
        #[source]
        source: SheetError,
    },

    #[error("Cannot write '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: ExportError,
    },
}

impl PipelineError {
    /// The extraction or building error, if that is what failed.
    pub fn sheet_error(&self) -> Option<&SheetError> {
        match self {
            PipelineError::Sheet { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Extract frames and build the descriptor from a decoded sheet.
///
/// Pure: no file access and no logging side effects beyond diagnostics.
pub fn process(
    image: &PixelBuffer,
    mode: &Mode,
) -> Result<(FrameSet, AnimationDescriptor), SheetError> {
    match mode {
        Mode::Grid(opts) => {
            let grid = grid::slice(image, opts.rows, opts.cols)?;
            let descriptor = AnimationDescriptorBuilder::new(opts.frame_duration_ms)
                .build_types(&grid, &opts.types)?;
            Ok((FrameSet::Grid(grid), descriptor))
        }
        Mode::Contour(opts) => {
            let frames = contour::extract(image, &opts.extractor)?;
            let descriptor =
                AnimationDescriptorBuilder::new(opts.frame_duration_ms).build(&frames, &opts.clips)?;
            Ok((FrameSet::Contour(frames), descriptor))
        }
    }
}

/// Process the sheet at `image_path` and write its descriptor alongside it.
pub fn run(image_path: &Path, options: &RunOptions) -> Result<RunReport, PipelineError> {
    let start = Instant::now();
    let sheet_error =
        |source: SheetError| PipelineError::Sheet { path: image_path.to_path_buf(), source };

    let bytes = std::fs::read(image_path)
        .map_err(|source| PipelineError::Read { path: image_path.to_path_buf(), source })?;
    let image = pixels::decode(&bytes).map_err(sheet_error)?;
    log::info!(
        "Decoded {} ({}x{}, {} channel(s)), {} mode",
        image_path.display(),
        image.width(),
        image.height(),
        image.channels(),
        options.mode.name()
    );

    let (frames, descriptor) = process(&image, &options.mode).map_err(sheet_error)?;

    let descriptor_path = output::sibling_path(image_path, &options.output.file_name);
    JsonExporter::new()
        .export(&descriptor, &descriptor_path, &ExportOptions { pretty: options.output.pretty })
        .map_err(|source| PipelineError::Export { path: descriptor_path.clone(), source })?;
    log::info!("Wrote {}", descriptor_path.display());

    let mut warnings = Vec::new();
    let debug_path = if options.output.debug {
        let path = output::sibling_path(image_path, &options.output.debug_file_name);
        match write_debug_image(&image, &frames, &path) {
            Ok(()) => {
                log::info!("Wrote {}", path.display());
                Some(path)
            }
            Err(message) => {
                log::warn!("Debug image skipped: {}", message);
                warnings.push(message);
                None
            }
        }
    } else {
        None
    };

    Ok(RunReport {
        layout: descriptor.layout(),
        frame_count: descriptor.frames().len(),
        frame_width: descriptor.frame_width(),
        frame_height: descriptor.frame_height(),
        clip_names: descriptor.clips().iter().map(|c| c.name.clone()).collect(),
        descriptor_path,
        debug_path,
        warnings,
        duration: start.elapsed(),
    })
}

fn write_debug_image(image: &PixelBuffer, frames: &FrameSet, path: &Path) -> Result<(), String> {
    let rendered = debug::render(image, frames.frames()).map_err(|e| e.to_string())?;
    output::save_png(&rendered, path).map_err(|e| format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::encode_png;
    use tempfile::TempDir;

    fn blob_sheet() -> PixelBuffer {
        // White 90x60 sheet, 3x2 grid, one 10x10 black square per cell
        let mut data = vec![255u8; 90 * 60 * 3];
        for row in 0..2u32 {
            for col in 0..3u32 {
                let (x0, y0) = (col * 30 + 10, row * 30 + 10);
                for y in y0..y0 + 10 {
                    for x in x0..x0 + 10 {
                        let i = ((y * 90 + x) * 3) as usize;
                        data[i..i + 3].copy_from_slice(&[0, 0, 0]);
                    }
                }
            }
        }
        PixelBuffer::from_raw(90, 60, 3, data).unwrap()
    }

    fn contour_mode() -> Mode {
        Mode::Contour(ContourOptions {
            extractor: ContourConfig { assumed_rows: 2, assumed_cols: 3, ..Default::default() },
            ..Default::default()
        })
    }

    fn write_sheet(dir: &Path, buffer: &PixelBuffer) -> PathBuf {
        let path = dir.join("sheet.png");
        std::fs::write(&path, encode_png(buffer).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_defaults_follow_config_defaults() {
        let grid = GridOptions::default();
        assert_eq!((grid.rows, grid.cols, grid.frame_duration_ms), (3, 3, 200));
        let contour = ContourOptions::default();
        assert_eq!(contour.extractor, ContourConfig::default());
        assert_eq!(contour.frame_duration_ms, 100);
    }

    #[test]
    fn test_process_contour() {
        let (frames, descriptor) = process(&blob_sheet(), &contour_mode()).unwrap();
        assert_eq!(frames.len(), 6);
        // 10x10 blobs padded by 2
        assert_eq!((descriptor.frame_width(), descriptor.frame_height()), (14, 14));
        assert_eq!(descriptor.frames()[4].x, 38);
        assert_eq!(descriptor.frames()[4].y, 38);
    }

    #[test]
    fn test_process_grid() {
        let mode = Mode::Grid(GridOptions {
            rows: 2,
            cols: 3,
            types: vec!["top".to_string()],
            frame_duration_ms: 200,
        });
        let (frames, descriptor) = process(&blob_sheet(), &mode).unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(descriptor.layout(), ClipLayout::Types);
        assert_eq!(descriptor.clip("top").unwrap().frames, vec![0, 1, 2]);
        assert_eq!(descriptor.clip("type_1").unwrap().frames, vec![3, 4, 5]);
    }

    #[test]
    fn test_run_writes_descriptor_and_debug() {
        let temp = TempDir::new().unwrap();
        let image_path = write_sheet(temp.path(), &blob_sheet());
        let options = RunOptions::new(contour_mode())
            .with_output(OutputOptions { debug: true, ..Default::default() });

        let report = run(&image_path, &options).unwrap();
        assert_eq!(report.frame_count, 6);
        assert_eq!(report.clip_names, vec!["all"]);
        assert_eq!(report.descriptor_path, temp.path().join("animation.json"));
        assert!(report.descriptor_path.exists());
        assert_eq!(report.debug_path, Some(temp.path().join("sprite_detection_debug.png")));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_run_failure_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let white = PixelBuffer::filled(40, 40, &[255, 255, 255]).unwrap();
        let image_path = write_sheet(temp.path(), &white);
        let options = RunOptions::new(contour_mode());

        let err = run(&image_path, &options).unwrap_err();
        assert_eq!(err.sheet_error().map(|e| e.kind()), Some("no_regions_found"));
        assert!(!temp.path().join("animation.json").exists());
    }

    #[test]
    fn test_run_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = run(&temp.path().join("missing.png"), &RunOptions::new(contour_mode()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_run_undecodable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sheet.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = run(&path, &RunOptions::new(contour_mode())).unwrap_err();
        assert_eq!(err.sheet_error().map(|e| e.kind()), Some("decode_failure"));
    }

    #[test]
    fn test_debug_failure_is_only_a_warning() {
        let temp = TempDir::new().unwrap();
        let sheet = PixelBuffer::filled(20, 10, &[0, 0, 0]).unwrap();
        let image_path = write_sheet(temp.path(), &sheet);
        // The sheet is a file, so nothing can be created beneath it
        let blocked = image_path.join("debug.png");

        let mode = Mode::Grid(GridOptions { rows: 1, cols: 2, ..Default::default() });
        let options = RunOptions::new(mode).with_output(OutputOptions {
            debug: true,
            debug_file_name: blocked.to_string_lossy().into_owned(),
            ..Default::default()
        });
        let report = run(&image_path, &options).unwrap();
        assert_eq!(report.frame_count, 2);
        assert!(report.debug_path.is_none());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.descriptor_path.exists());
    }
}
