//! Animation clips and the caller-supplied clip table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::SheetError;

/// A named, ordered sequence of frame indices.
///
/// Indices may repeat (a single-frame idle clip, a ping-pong cycle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub frames: Vec<usize>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frames: Vec<usize>) -> Self {
        Self { name: name.into(), frames }
    }
}

/// Clip table requested by the caller, in declaration order.
///
/// Nothing is checked on construction; [`ClipSpec::validate`] runs against
/// the real frame count when a descriptor is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipSpec {
    clips: Vec<AnimationClip>,
}

impl ClipSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clip, builder style.
    pub fn with_clip(mut self, name: impl Into<String>, frames: Vec<usize>) -> Self {
        self.clips.push(AnimationClip::new(name, frames));
        self
    }

    pub fn push(&mut self, clip: AnimationClip) {
        self.clips.push(clip);
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Check every clip against `frame_count` frames.
    ///
    /// Reports the first problem found, in declaration order.
    pub fn validate(&self, frame_count: usize) -> Result<(), SheetError> {
        validate_clips(&self.clips, frame_count)
    }

    /// Plain-language problems for config validation (no frame count known yet).
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for clip in &self.clips {
            if clip.name.trim().is_empty() {
                problems.push("clip name must not be empty".to_string());
            }
            if clip.frames.is_empty() {
                problems.push(format!("clip '{}' has no frames", clip.name));
            }
            if !seen.insert(clip.name.as_str()) {
                problems.push(format!("clip '{}' is defined more than once", clip.name));
            }
        }
        problems
    }
}

impl FromIterator<AnimationClip> for ClipSpec {
    fn from_iter<I: IntoIterator<Item = AnimationClip>>(iter: I) -> Self {
        Self { clips: iter.into_iter().collect() }
    }
}

/// Parse the compact text form `name=0,1,2;other=5`.
///
/// Whitespace around names and indices is ignored, as is a trailing `;`.
impl FromStr for ClipSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spec = ClipSpec::new();
        for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, frames) = part
                .split_once('=')
                .ok_or_else(|| format!("expected 'name=indices', got '{}'", part))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("missing clip name in '{}'", part));
            }
            let frames = frames
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(|f| {
                    f.parse::<usize>()
                        .map_err(|_| format!("invalid frame index '{}' in clip '{}'", f, name))
                })
                .collect::<Result<Vec<_>, _>>()?;
            spec.push(AnimationClip::new(name, frames));
        }
        Ok(spec)
    }
}

pub(crate) fn validate_clips(clips: &[AnimationClip], frame_count: usize) -> Result<(), SheetError> {
    let mut seen = HashSet::new();
    for clip in clips {
        if !seen.insert(clip.name.as_str()) {
            return Err(SheetError::DuplicateClip { clip: clip.name.clone() });
        }
        if clip.frames.is_empty() {
            return Err(SheetError::EmptyClip { clip: clip.name.clone() });
        }
        if let Some(&index) = clip.frames.iter().find(|&&i| i >= frame_count) {
            return Err(SheetError::InvalidClipReference {
                clip: clip.name.clone(),
                index,
                frame_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clip_spec() {
        let spec: ClipSpec = "swim_left=0,1,2; idle_front = 5 ;".parse().unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.clips()[0], AnimationClip::new("swim_left", vec![0, 1, 2]));
        assert_eq!(spec.clips()[1], AnimationClip::new("idle_front", vec![5]));
    }

    #[test]
    fn test_parse_clip_spec_errors() {
        assert!("swim_left".parse::<ClipSpec>().is_err());
        assert!("=1,2".parse::<ClipSpec>().is_err());
        assert!("walk=1,x".parse::<ClipSpec>().unwrap_err().contains("'x'"));
    }

    #[test]
    fn test_parse_empty_string_is_empty_spec() {
        let spec: ClipSpec = "".parse().unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_validate_out_of_range() {
        let spec = ClipSpec::new().with_clip("walk", vec![0, 1]).with_clip("jump", vec![2, 5]);
        let err = spec.validate(3).unwrap_err();
        assert_eq!(
            err,
            SheetError::InvalidClipReference { clip: "jump".to_string(), index: 5, frame_count: 3 }
        );
    }

    #[test]
    fn test_validate_duplicates_and_empty() {
        let dup = ClipSpec::new().with_clip("a", vec![0]).with_clip("a", vec![1]);
        assert_eq!(dup.validate(2).unwrap_err(), SheetError::DuplicateClip { clip: "a".into() });

        let empty = ClipSpec::new().with_clip("a", vec![]);
        assert_eq!(empty.validate(2).unwrap_err(), SheetError::EmptyClip { clip: "a".into() });
    }

    #[test]
    fn test_validate_allows_repeats() {
        let spec = ClipSpec::new().with_clip("pingpong", vec![0, 1, 2, 1]);
        assert!(spec.validate(3).is_ok());
    }

    #[test]
    fn test_problems_collects_everything() {
        let spec = ClipSpec::new()
            .with_clip("", vec![0])
            .with_clip("a", vec![])
            .with_clip("a", vec![1]);
        assert_eq!(spec.problems().len(), 3);
    }
}
