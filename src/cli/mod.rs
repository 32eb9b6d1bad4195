//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to the
//! extraction commands.

mod extract;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::models::ClipSpec;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// spritecut - Cut sprite sheets into frames and write animation descriptors
#[derive(Parser)]
#[command(name = "spritecut")]
#[command(about = "Cut sprite sheets into frames and write an animation.json descriptor")]
#[command(version)]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every extraction command
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file (default: spritecut.toml found from the image's directory upward)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Descriptor file name, written next to the image
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Also write a debug image with every frame outlined and numbered
    #[arg(long)]
    pub debug: bool,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Slice a sheet into a uniform grid, one clip per row
    Grid {
        /// Sprite sheet image
        image: PathBuf,

        /// Number of grid rows
        #[arg(long)]
        rows: Option<u32>,

        /// Number of grid columns
        #[arg(long)]
        cols: Option<u32>,

        /// Clip names for each row, comma separated (e.g. seaweed,clam,rock)
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        /// Frame duration in milliseconds
        #[arg(long, value_name = "MS")]
        duration: Option<u32>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Detect sprites by their outlines and order them by an assumed grid
    Contour {
        /// Sprite sheet image
        image: PathBuf,

        /// Rows of the assumed grid used for ordering
        #[arg(long)]
        rows: Option<u32>,

        /// Columns of the assumed grid used for ordering
        #[arg(long)]
        cols: Option<u32>,

        /// Discard regions with fewer foreground pixels than this
        #[arg(long)]
        min_area: Option<u32>,

        /// Margin added around each detected sprite
        #[arg(long)]
        padding: Option<u32>,

        /// Background luminance cut-off (0-255) for sheets without alpha
        #[arg(long)]
        threshold: Option<u32>,

        /// Alpha cut-off (0-255) for sheets with alpha
        #[arg(long)]
        alpha_threshold: Option<u32>,

        /// Clip table, e.g. "swim_left=0,1,2;idle_front=5"
        #[arg(long, value_name = "SPEC", value_parser = clap::value_parser!(ClipSpec))]
        clips: Option<ClipSpec>,

        /// Fail when the region count differs from rows x cols
        #[arg(long)]
        strict: bool,

        /// Frame duration in milliseconds
        #[arg(long, value_name = "MS")]
        duration: Option<u32>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    match cli.command {
        Commands::Grid { image, rows, cols, types, duration, common } => {
            let overrides = extract::common_overrides(&common).with_grid(rows, cols, types, duration);
            extract::run_extract(&image, extract::ModeKind::Grid, &common, &overrides)
        }
        Commands::Contour {
            image,
            rows,
            cols,
            min_area,
            padding,
            threshold,
            alpha_threshold,
            clips,
            strict,
            duration,
            common,
        } => {
            let overrides = crate::config::CliOverrides {
                contour_rows: rows,
                contour_cols: cols,
                min_area,
                padding,
                background_threshold: threshold,
                alpha_threshold,
                clips,
                strict_layout: strict.then_some(true),
                contour_duration: duration,
                ..extract::common_overrides(&common)
            };
            extract::run_extract(&image, extract::ModeKind::Contour, &common, &overrides)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_contour_args() {
        let cli = Cli::try_parse_from([
            "spritecut",
            "contour",
            "fish.png",
            "--min-area",
            "50",
            "--clips",
            "swim=0,1;idle=2",
            "--strict",
            "--debug",
        ])
        .unwrap();
        match cli.command {
            Commands::Contour { image, min_area, clips, strict, common, .. } => {
                assert_eq!(image, PathBuf::from("fish.png"));
                assert_eq!(min_area, Some(50));
                assert_eq!(clips.unwrap().len(), 2);
                assert!(strict);
                assert!(common.debug);
            }
            _ => panic!("expected contour command"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_parse_grid_types() {
        let cli = Cli::try_parse_from([
            "spritecut",
            "grid",
            "seabed.png",
            "--types",
            "seaweed,clam,rock",
            "--log-level",
            "debug",
        ])
        .unwrap();
        match cli.command {
            Commands::Grid { types, .. } => {
                assert_eq!(types.unwrap(), vec!["seaweed", "clam", "rock"]);
            }
            _ => panic!("expected grid command"),
        }
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_bad_clip_spec_rejected() {
        let result =
            Cli::try_parse_from(["spritecut", "contour", "fish.png", "--clips", "swim=0,x"]);
        assert!(result.is_err());
    }
}
