//! Animation descriptor building - turns ordered frames into a clip table

use crate::error::SheetError;
use crate::models::{
    AnimationClip, AnimationDescriptor, ClipLayout, ClipSpec, FrameRecord, FrameSet, GridFrames,
    Rect,
};

/// Name of the clip synthesized when a contour run has no clip table.
pub const DEFAULT_CLIP_NAME: &str = "all";

/// Assembles [`AnimationDescriptor`]s from extractor output.
///
/// Building is pure: identical inputs always produce identical descriptors,
/// and therefore byte-identical JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDescriptorBuilder {
    frame_duration_ms: u32,
}

impl AnimationDescriptorBuilder {
    pub fn new(frame_duration_ms: u32) -> Self {
        Self { frame_duration_ms }
    }

    /// Build an `animations` descriptor from ordered frames and a clip table.
    ///
    /// Frame size is the rounded mean of the frame sizes. An empty clip table
    /// yields a single [`DEFAULT_CLIP_NAME`] clip over every frame.
    ///
    /// # Examples
    ///
    /// ```
    /// use spritecut::animation::AnimationDescriptorBuilder;
    /// use spritecut::models::{ClipSpec, FrameRecord, Rect};
    ///
    /// let frames = vec![
    ///     FrameRecord::new(0, Rect::new(0, 0, 10, 8)),
    ///     FrameRecord::new(1, Rect::new(12, 0, 20, 8)),
    ///     FrameRecord::new(2, Rect::new(40, 0, 30, 8)),
    /// ];
    /// let clips = ClipSpec::new().with_clip("swim", vec![0, 1, 2]);
    /// let descriptor = AnimationDescriptorBuilder::new(100).build(&frames, &clips).unwrap();
    /// assert_eq!(descriptor.frame_width(), 20);
    /// ```
    pub fn build(
        &self,
        frames: &[FrameRecord],
        clips: &ClipSpec,
    ) -> Result<AnimationDescriptor, SheetError> {
        let rects = rects_by_index(frames)?;
        let (frame_width, frame_height) = normalized_size(&rects).ok_or(SheetError::NoFrames)?;

        let clips = if clips.is_empty() {
            vec![AnimationClip::new(DEFAULT_CLIP_NAME, (0..rects.len()).collect())]
        } else {
            clips.validate(rects.len())?;
            clips.clips().to_vec()
        };

        AnimationDescriptor::new(
            frame_width,
            frame_height,
            self.frame_duration_ms,
            rects,
            clips,
            ClipLayout::Animations,
        )
    }

    /// Build a `types` descriptor with one clip per grid row.
    ///
    /// Rows without a name in `type_names` are called `type_<row>`. More
    /// names than rows is an `InvalidLayout`.
    pub fn build_types(
        &self,
        grid: &GridFrames,
        type_names: &[String],
    ) -> Result<AnimationDescriptor, SheetError> {
        if type_names.len() > grid.rows as usize {
            return Err(SheetError::invalid_layout(format!(
                "{} type name(s) given for a grid with {} row(s)",
                type_names.len(),
                grid.rows
            )));
        }

        let rects = rects_by_index(&grid.frames)?;
        let (frame_width, frame_height) = normalized_size(&rects).ok_or(SheetError::NoFrames)?;
        let clips = (0..grid.rows)
            .map(|row| {
                let name = type_names
                    .get(row as usize)
                    .cloned()
                    .unwrap_or_else(|| format!("type_{}", row));
                AnimationClip::new(name, grid.row_indices(row))
            })
            .collect();

        AnimationDescriptor::new(
            frame_width,
            frame_height,
            self.frame_duration_ms,
            rects,
            clips,
            ClipLayout::Types,
        )
    }

    /// Build from either extractor's output.
    ///
    /// Grid sets use `type_names`, contour sets use `clips`.
    pub fn build_frame_set(
        &self,
        set: &FrameSet,
        clips: &ClipSpec,
        type_names: &[String],
    ) -> Result<AnimationDescriptor, SheetError> {
        match set {
            FrameSet::Grid(grid) => self.build_types(grid, type_names),
            FrameSet::Contour(frames) => self.build(frames, clips),
        }
    }
}

/// Rounded mean width and height, or `None` for no frames.
///
/// When all frames share a size this is exactly that size.
pub fn normalized_size(rects: &[Rect]) -> Option<(u32, u32)> {
    if rects.is_empty() {
        return None;
    }
    let n = rects.len() as f64;
    let total_w: u64 = rects.iter().map(|r| r.width as u64).sum();
    let total_h: u64 = rects.iter().map(|r| r.height as u64).sum();
    Some(((total_w as f64 / n).round() as u32, (total_h as f64 / n).round() as u32))
}

/// Rectangles in index order; indices must be exactly `0..frames.len()`.
fn rects_by_index(frames: &[FrameRecord]) -> Result<Vec<Rect>, SheetError> {
    if frames.is_empty() {
        return Err(SheetError::NoFrames);
    }
    let mut ordered: Vec<&FrameRecord> = frames.iter().collect();
    ordered.sort_by_key(|f| f.index);
    if let Some((position, frame)) = ordered.iter().enumerate().find(|(i, f)| f.index != *i) {
        return Err(SheetError::invalid_layout(format!(
            "frame indices must run 0..{} without gaps, found {} at position {}",
            frames.len(),
            frame.index,
            position
        )));
    }
    Ok(ordered.into_iter().map(|f| f.rect).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::slice_dimensions;

    fn frames_with_widths(widths: &[u32]) -> Vec<FrameRecord> {
        let mut x = 0;
        widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let rect = Rect::new(x, 0, w, 10 + i as u32);
                x += w;
                FrameRecord::new(i, rect)
            })
            .collect()
    }

    #[test]
    fn test_mean_width() {
        let frames = frames_with_widths(&[10, 20, 30]);
        let d = AnimationDescriptorBuilder::new(100).build(&frames, &ClipSpec::new()).unwrap();
        assert_eq!(d.frame_width(), 20);
        // heights 10, 11, 12
        assert_eq!(d.frame_height(), 11);
    }

    #[test]
    fn test_mean_rounds_half_up() {
        let rects = [Rect::new(0, 0, 10, 1), Rect::new(0, 0, 11, 2)];
        assert_eq!(normalized_size(&rects), Some((11, 2)));
        assert_eq!(normalized_size(&[]), None);
    }

    #[test]
    fn test_clip_out_of_range() {
        let frames = frames_with_widths(&[10, 20, 30]);
        let clips = ClipSpec::new().with_clip("idle_front", vec![5]);
        let err = AnimationDescriptorBuilder::new(100).build(&frames, &clips).unwrap_err();
        assert_eq!(
            err,
            SheetError::InvalidClipReference {
                clip: "idle_front".to_string(),
                index: 5,
                frame_count: 3
            }
        );
    }

    #[test]
    fn test_default_clip() {
        let frames = frames_with_widths(&[4, 4]);
        let d = AnimationDescriptorBuilder::new(80).build(&frames, &ClipSpec::new()).unwrap();
        assert_eq!(d.clips(), &[AnimationClip::new(DEFAULT_CLIP_NAME, vec![0, 1])]);
        assert_eq!(d.frame_duration_ms(), 80);
    }

    #[test]
    fn test_explicit_clips_keep_order() {
        let frames = frames_with_widths(&[4; 9]);
        let clips = ClipSpec::new()
            .with_clip("swim_left", vec![0, 1, 2])
            .with_clip("swim_front", vec![4, 5])
            .with_clip("idle_front", vec![5]);
        let d = AnimationDescriptorBuilder::new(100).build(&frames, &clips).unwrap();
        let names: Vec<&str> = d.clips().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["swim_left", "swim_front", "idle_front"]);
    }

    #[test]
    fn test_empty_frames() {
        let err = AnimationDescriptorBuilder::new(100).build(&[], &ClipSpec::new()).unwrap_err();
        assert_eq!(err, SheetError::NoFrames);
    }

    #[test]
    fn test_frames_reordered_by_index() {
        let frames = vec![
            FrameRecord::new(1, Rect::new(10, 0, 5, 5)),
            FrameRecord::new(0, Rect::new(0, 0, 5, 5)),
        ];
        let d = AnimationDescriptorBuilder::new(100).build(&frames, &ClipSpec::new()).unwrap();
        assert_eq!(d.frames()[0].x, 0);
        assert_eq!(d.frames()[1].x, 10);
    }

    #[test]
    fn test_index_gap_rejected() {
        let frames = vec![
            FrameRecord::new(0, Rect::new(0, 0, 5, 5)),
            FrameRecord::new(2, Rect::new(10, 0, 5, 5)),
        ];
        let err = AnimationDescriptorBuilder::new(100).build(&frames, &ClipSpec::new()).unwrap_err();
        assert_eq!(err.kind(), "invalid_layout");
    }

    #[test]
    fn test_build_types_names_rows() {
        let grid = slice_dimensions(300, 300, 3, 3).unwrap();
        let names = vec!["seaweed".to_string(), "clam".to_string()];
        let d = AnimationDescriptorBuilder::new(200).build_types(&grid, &names).unwrap();
        assert_eq!(d.layout(), ClipLayout::Types);
        assert_eq!((d.frame_width(), d.frame_height()), (100, 100));
        assert_eq!(d.clip("seaweed").unwrap().frames, vec![0, 1, 2]);
        assert_eq!(d.clip("clam").unwrap().frames, vec![3, 4, 5]);
        assert_eq!(d.clip("type_2").unwrap().frames, vec![6, 7, 8]);
    }

    #[test]
    fn test_build_types_too_many_names() {
        let grid = slice_dimensions(20, 20, 1, 2).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];
        let err = AnimationDescriptorBuilder::new(200).build_types(&grid, &names).unwrap_err();
        assert_eq!(err.kind(), "invalid_layout");
    }

    #[test]
    fn test_build_types_duplicate_names() {
        let grid = slice_dimensions(20, 20, 2, 2).unwrap();
        let names = vec!["rock".to_string(), "rock".to_string()];
        let err = AnimationDescriptorBuilder::new(200).build_types(&grid, &names).unwrap_err();
        assert_eq!(err, SheetError::DuplicateClip { clip: "rock".to_string() });
    }

    #[test]
    fn test_build_is_deterministic() {
        let frames = frames_with_widths(&[10, 20, 30]);
        let clips = ClipSpec::new().with_clip("a", vec![2, 1, 0]).with_clip("b", vec![1]);
        let builder = AnimationDescriptorBuilder::new(100);
        let first = serde_json::to_vec(&builder.build(&frames, &clips).unwrap()).unwrap();
        let second = serde_json::to_vec(&builder.build(&frames, &clips).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_frame_set_dispatch() {
        let grid = slice_dimensions(20, 10, 1, 2).unwrap();
        let builder = AnimationDescriptorBuilder::new(50);
        let d = builder.build_frame_set(&FrameSet::Grid(grid), &ClipSpec::new(), &[]).unwrap();
        assert_eq!(d.layout(), ClipLayout::Types);

        let contour = FrameSet::Contour(frames_with_widths(&[3, 3]));
        let d = builder.build_frame_set(&contour, &ClipSpec::new(), &[]).unwrap();
        assert_eq!(d.layout(), ClipLayout::Animations);
    }
}
