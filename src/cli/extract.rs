//! CLI dispatch for the `grid` and `contour` commands.

use std::path::Path;
use std::process::ExitCode;

use crate::config::{self, CliOverrides, ConfigError, SheetConfig};
use crate::models::ClipLayout;
use crate::pipeline::{self, Mode, PipelineError, RunOptions, RunReport};

use super::{CommonArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Grid,
    Contour,
}

/// Overrides from the options every command shares.
pub fn common_overrides(common: &CommonArgs) -> CliOverrides {
    CliOverrides {
        output: common.output.clone(),
        debug: common.debug.then_some(true),
        pretty: common.compact.then_some(false),
        ..Default::default()
    }
}

impl CliOverrides {
    pub(crate) fn with_grid(
        mut self,
        rows: Option<u32>,
        cols: Option<u32>,
        types: Option<Vec<String>>,
        duration: Option<u32>,
    ) -> Self {
        self.grid_rows = rows;
        self.grid_cols = cols;
        self.types = types;
        self.grid_duration = duration;
        self
    }
}

/// Load the config for `image` and apply command-line overrides.
fn resolve_config(
    image: &Path,
    common: &CommonArgs,
    overrides: &CliOverrides,
) -> Result<SheetConfig, ConfigError> {
    let mut config = config::load_config(common.config.as_deref(), image)?;
    config::merge_cli_overrides(&mut config, overrides);
    config::check(&config)?;
    Ok(config)
}

/// Execute an extraction command.
pub fn run_extract(
    image: &Path,
    kind: ModeKind,
    common: &CommonArgs,
    overrides: &CliOverrides,
) -> ExitCode {
    let config = match resolve_config(image, common, overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mode = match kind {
        ModeKind::Grid => Mode::Grid(config.grid_options()),
        ModeKind::Contour => Mode::Contour(config.contour_options()),
    };
    let options = RunOptions::new(mode).with_output(config.output_options());

    match pipeline::run(image, &options) {
        Ok(report) => {
            print_report(&report);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            report_error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn print_report(report: &RunReport) {
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    let label = match report.layout {
        ClipLayout::Animations => "Animations",
        ClipLayout::Types => "Types",
    };
    println!(
        "Detected {} frame(s), normalized to {}x{}",
        report.frame_count, report.frame_width, report.frame_height
    );
    println!("{}: {}", label, report.clip_names.join(", "));
    println!("Descriptor written to {}", report.descriptor_path.display());
    if let Some(ref debug_path) = report.debug_path {
        println!("Debug image written to {}", debug_path.display());
    }
}

fn report_error(error: &PipelineError) {
    eprintln!("Error: {}", error);
    if let Some(sheet) = error.sheet_error() {
        log::debug!("error kind: {}", sheet.kind());
    }
}
