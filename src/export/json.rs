//! JSON descriptor export.
//!
//! Writes an [`AnimationDescriptor`] as the `animation.json` document a
//! rendering client loads alongside the sheet image.

use crate::export::{ExportOptions, Result};
use crate::models::AnimationDescriptor;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// JSON descriptor exporter.
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Create a new JSON exporter.
    pub fn new() -> Self {
        Self
    }

    /// Export a descriptor to a JSON string.
    ///
    /// Pretty output ends with a newline so written files are POSIX text.
    pub fn export_to_string(
        &self,
        descriptor: &AnimationDescriptor,
        options: &ExportOptions,
    ) -> Result<String> {
        let json = if options.pretty {
            let mut s = serde_json::to_string_pretty(descriptor)?;
            s.push('\n');
            s
        } else {
            serde_json::to_string(descriptor)?
        };
        Ok(json)
    }

    /// Export a descriptor to `output_path`, creating parent directories.
    pub fn export(
        &self,
        descriptor: &AnimationDescriptor,
        output_path: &Path,
        options: &ExportOptions,
    ) -> Result<()> {
        let json = self.export_to_string(descriptor, options)?;

        // Ensure parent directory exists
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(output_path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

/// Read a descriptor back from a JSON file.
pub fn load_descriptor(path: &Path) -> Result<AnimationDescriptor> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
