//! spritecut - Library for cutting sprite sheets into animation frames
//!
//! This library provides functionality to:
//! - Slice a sheet into a uniform grid of frames
//! - Detect irregularly placed sprites by their connected regions
//! - Build an `animation.json` descriptor of frames and named clips
//! - Render a debug image with every detected frame outlined

pub mod animation;
pub mod cli;
pub mod config;
pub mod contour;
pub mod debug;
pub mod error;
pub mod export;
pub mod grid;
pub mod mask;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod pixels;
