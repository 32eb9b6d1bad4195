//! Data models shared by the extractors, the builder and the exporters

mod clip;
mod descriptor;
mod frame;

pub use clip::{AnimationClip, ClipSpec};
pub use descriptor::{AnimationDescriptor, ClipLayout};
pub use frame::{FrameRecord, FrameSet, GridFrames, Rect};
