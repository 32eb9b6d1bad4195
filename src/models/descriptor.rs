//! The animation descriptor and its JSON document shapes.
//!
//! A descriptor renders as one of two documents. Contour output lists every
//! frame once and names clips by index:
//!
//! ```json
//! {
//!   "frameWidth": 32, "frameHeight": 30, "frameDurationMs": 100,
//!   "frameData": [{"x": 0, "y": 0, "width": 32, "height": 30}],
//!   "animations": {"swim_left": [0]}
//! }
//! ```
//!
//! Grid output groups frames by row ("type"):
//!
//! ```json
//! {
//!   "frameWidth": 100, "frameHeight": 133, "frameDurationMs": 200,
//!   "types": [{"name": "seaweed", "frames": [{"x": 0, "y": 0, "width": 100, "height": 133}]}]
//! }
//! ```
//!
//! Readers tell them apart by the presence of `types` or `animations`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::clip::{validate_clips, AnimationClip};
use super::frame::Rect;
use crate::error::SheetError;

/// Which document shape the clip table renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipLayout {
    /// `animations`: name -> frame indices
    Animations,
    /// `types`: one entry per grid row, each carrying its own rectangles
    Types,
}

/// Frame geometry plus clip table, ready for a rendering client.
///
/// Every index referenced by a clip is `< frames().len()`; construction and
/// deserialization both enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DescriptorDoc", try_from = "DescriptorDoc")]
pub struct AnimationDescriptor {
    frame_width: u32,
    frame_height: u32,
    frame_duration_ms: u32,
    frames: Vec<Rect>,
    clips: Vec<AnimationClip>,
    layout: ClipLayout,
}

impl AnimationDescriptor {
    /// Assemble a descriptor, checking the clip table against `frames`.
    pub fn new(
        frame_width: u32,
        frame_height: u32,
        frame_duration_ms: u32,
        frames: Vec<Rect>,
        clips: Vec<AnimationClip>,
        layout: ClipLayout,
    ) -> Result<Self, SheetError> {
        if frames.is_empty() {
            return Err(SheetError::NoFrames);
        }
        validate_clips(&clips, frames.len())?;
        if layout == ClipLayout::Types {
            check_type_partition(&clips, frames.len())?;
        }
        Ok(Self { frame_width, frame_height, frame_duration_ms, frames, clips, layout })
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn frame_duration_ms(&self) -> u32 {
        self.frame_duration_ms
    }

    /// Frame rectangles, by index.
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    /// Clips in declaration order.
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn layout(&self) -> ClipLayout {
        self.layout
    }
}

/// `types` documents store rectangles per clip, so the clips must cover
/// `0..frame_count` as consecutive ascending runs, in order.
fn check_type_partition(clips: &[AnimationClip], frame_count: usize) -> Result<(), SheetError> {
    let mut next = 0;
    for clip in clips {
        for &index in &clip.frames {
            if index != next {
                return Err(SheetError::invalid_layout(format!(
                    "type '{}' must continue at frame {}, found {}",
                    clip.name, next, index
                )));
            }
            next += 1;
        }
    }
    if next != frame_count {
        return Err(SheetError::invalid_layout(format!(
            "types cover {} of {} frame(s)",
            next, frame_count
        )));
    }
    Ok(())
}

// ============================================================================
// Wire documents
// ============================================================================

fn default_frame_duration() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DescriptorDoc {
    Types(TypesDoc),
    Animations(AnimationsDoc),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimationsDoc {
    frame_width: u32,
    frame_height: u32,
    #[serde(default = "default_frame_duration", alias = "frameDuration")]
    frame_duration_ms: u32,
    frame_data: Vec<Rect>,
    animations: ClipMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypesDoc {
    frame_width: u32,
    frame_height: u32,
    #[serde(default = "default_frame_duration", alias = "frameDuration")]
    frame_duration_ms: u32,
    types: Vec<TypeDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TypeDoc {
    name: String,
    frames: Vec<Rect>,
}

/// Clip list that serializes as a JSON object, keeping declaration order.
#[derive(Debug, Clone, Default)]
struct ClipMap(Vec<AnimationClip>);

impl Serialize for ClipMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for clip in &self.0 {
            map.serialize_entry(&clip.name, &clip.frames)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClipMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClipMapVisitor;

        impl<'de> Visitor<'de> for ClipMapVisitor {
            type Value = ClipMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of clip names to frame index arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ClipMap, A::Error> {
                let mut clips = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, frames)) = access.next_entry::<String, Vec<usize>>()? {
                    clips.push(AnimationClip { name, frames });
                }
                Ok(ClipMap(clips))
            }
        }

        deserializer.deserialize_map(ClipMapVisitor)
    }
}

impl From<AnimationDescriptor> for DescriptorDoc {
    fn from(d: AnimationDescriptor) -> Self {
        match d.layout {
            ClipLayout::Animations => DescriptorDoc::Animations(AnimationsDoc {
                frame_width: d.frame_width,
                frame_height: d.frame_height,
                frame_duration_ms: d.frame_duration_ms,
                frame_data: d.frames,
                animations: ClipMap(d.clips),
            }),
            ClipLayout::Types => {
                let types = d
                    .clips
                    .into_iter()
                    .map(|clip| TypeDoc {
                        frames: clip.frames.iter().filter_map(|&i| d.frames.get(i).copied()).collect(),
                        name: clip.name,
                    })
                    .collect();
                DescriptorDoc::Types(TypesDoc {
                    frame_width: d.frame_width,
                    frame_height: d.frame_height,
                    frame_duration_ms: d.frame_duration_ms,
                    types,
                })
            }
        }
    }
}

impl TryFrom<DescriptorDoc> for AnimationDescriptor {
    type Error = SheetError;

    fn try_from(doc: DescriptorDoc) -> Result<Self, Self::Error> {
        let (width, height, duration, frames, clips, layout) = match doc {
            DescriptorDoc::Animations(doc) => (
                doc.frame_width,
                doc.frame_height,
                doc.frame_duration_ms,
                doc.frame_data,
                doc.animations.0,
                ClipLayout::Animations,
            ),
            DescriptorDoc::Types(doc) => {
                let mut frames = Vec::new();
                let mut clips = Vec::with_capacity(doc.types.len());
                for ty in doc.types {
                    let start = frames.len();
                    frames.extend(ty.frames);
                    clips.push(AnimationClip { name: ty.name, frames: (start..frames.len()).collect() });
                }
                (doc.frame_width, doc.frame_height, doc.frame_duration_ms, frames, clips, ClipLayout::Types)
            }
        };
        if let Some(index) = frames.iter().position(|r| r.width == 0 || r.height == 0) {
            return Err(SheetError::invalid_layout(format!("frame {} has zero size", index)));
        }
        AnimationDescriptor::new(width, height, duration, frames, clips, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour_descriptor() -> AnimationDescriptor {
        AnimationDescriptor::new(
            20,
            10,
            100,
            vec![Rect::new(0, 0, 10, 10), Rect::new(12, 0, 20, 10), Rect::new(40, 0, 30, 10)],
            vec![
                AnimationClip::new("swim_left", vec![0, 1, 2]),
                AnimationClip::new("idle_front", vec![1]),
            ],
            ClipLayout::Animations,
        )
        .unwrap()
    }

    fn grid_descriptor() -> AnimationDescriptor {
        AnimationDescriptor::new(
            5,
            5,
            200,
            vec![
                Rect::new(0, 0, 5, 5),
                Rect::new(5, 0, 5, 5),
                Rect::new(0, 5, 5, 5),
                Rect::new(5, 5, 5, 5),
            ],
            vec![AnimationClip::new("seaweed", vec![0, 1]), AnimationClip::new("clam", vec![2, 3])],
            ClipLayout::Types,
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_dangling_clip() {
        let err = AnimationDescriptor::new(
            1,
            1,
            100,
            vec![Rect::new(0, 0, 1, 1)],
            vec![AnimationClip::new("walk", vec![0, 3])],
            ClipLayout::Animations,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SheetError::InvalidClipReference { clip: "walk".into(), index: 3, frame_count: 1 }
        );
    }

    #[test]
    fn test_new_rejects_no_frames() {
        let err =
            AnimationDescriptor::new(1, 1, 100, vec![], vec![], ClipLayout::Animations).unwrap_err();
        assert_eq!(err, SheetError::NoFrames);
    }

    #[test]
    fn test_animations_document_shape() {
        let value = serde_json::to_value(contour_descriptor()).unwrap();
        assert_eq!(value["frameWidth"], 20);
        assert_eq!(value["frameHeight"], 10);
        assert_eq!(value["frameDurationMs"], 100);
        assert_eq!(value["frameData"][1]["x"], 12);
        assert_eq!(value["frameData"][2]["width"], 30);
        assert_eq!(value["animations"]["swim_left"], serde_json::json!([0, 1, 2]));
        assert_eq!(value["animations"]["idle_front"], serde_json::json!([1]));
        assert!(value.get("types").is_none());
    }

    #[test]
    fn test_animations_keep_declaration_order() {
        let json = serde_json::to_string(&contour_descriptor()).unwrap();
        let swim = json.find("swim_left").unwrap();
        let idle = json.find("idle_front").unwrap();
        assert!(swim < idle);
    }

    #[test]
    fn test_types_document_shape() {
        let value = serde_json::to_value(grid_descriptor()).unwrap();
        assert_eq!(value["types"][0]["name"], "seaweed");
        assert_eq!(value["types"][1]["frames"][0]["y"], 5);
        assert_eq!(value["types"][1]["frames"][1]["x"], 5);
        assert!(value.get("animations").is_none());
        assert!(value.get("frameData").is_none());
    }

    #[test]
    fn test_roundtrip_animations() {
        let original = contour_descriptor();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let parsed: AnimationDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.clips()[0].name, "swim_left");
    }

    #[test]
    fn test_roundtrip_types() {
        let original = grid_descriptor();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: AnimationDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.layout(), ClipLayout::Types);
    }

    #[test]
    fn test_types_must_partition_frames() {
        let frames = vec![Rect::new(0, 0, 5, 5), Rect::new(5, 0, 5, 5), Rect::new(10, 0, 5, 5)];

        // repeated index and a frame no type covers
        let repeated = AnimationDescriptor::new(
            5,
            5,
            100,
            frames.clone(),
            vec![AnimationClip::new("idle", vec![1, 1]), AnimationClip::new("walk", vec![0])],
            ClipLayout::Types,
        )
        .unwrap_err();
        assert_eq!(repeated.kind(), "invalid_layout");

        let uncovered = AnimationDescriptor::new(
            5,
            5,
            100,
            frames.clone(),
            vec![AnimationClip::new("idle", vec![0, 1])],
            ClipLayout::Types,
        )
        .unwrap_err();
        assert!(uncovered.to_string().contains("2 of 3"));

        // the same clips are fine for an animations table
        let animations = AnimationDescriptor::new(
            5,
            5,
            100,
            frames,
            vec![AnimationClip::new("idle", vec![1, 1]), AnimationClip::new("walk", vec![0])],
            ClipLayout::Animations,
        )
        .unwrap();
        let json = serde_json::to_string(&animations).unwrap();
        let parsed: AnimationDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, animations);
    }

    #[test]
    fn test_deserialize_rejects_dangling_index() {
        let json = r#"{
            "frameWidth": 1, "frameHeight": 1, "frameDurationMs": 100,
            "frameData": [{"x": 0, "y": 0, "width": 1, "height": 1}],
            "animations": {"walk": [0, 7]}
        }"#;
        let err = serde_json::from_str::<AnimationDescriptor>(json).unwrap_err();
        assert!(err.to_string().contains("walk"));
    }

    #[test]
    fn test_deserialize_accepts_legacy_frame_duration() {
        let json = r#"{
            "frameWidth": 2, "frameHeight": 2, "frameDuration": 200,
            "types": [{"name": "rock", "frames": [{"x": 0, "y": 0, "width": 2, "height": 2}]}]
        }"#;
        let parsed: AnimationDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.frame_duration_ms(), 200);
        assert_eq!(parsed.clip("rock").unwrap().frames, vec![0]);
    }

    #[test]
    fn test_clip_lookup() {
        let d = contour_descriptor();
        assert_eq!(d.clip("idle_front").unwrap().frames, vec![1]);
        assert!(d.clip("missing").is_none());
    }
}
