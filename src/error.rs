//! Import error type
//!
//! Only structural failures surface here: conditions under which the target
//! scene would be unsound and the whole import must abort. Per-item problems
//! (non-triangle meshes, overfull bone slots, unusable texture references)
//! are logged and skipped instead; missing optional fields fall back to
//! documented defaults silently.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// A bone influences a mesh that is placed in the graph more than once.
    /// Skinning subtracts a single world matrix per bone, so the import
    /// cannot proceed.
    #[error("{}: bone '{bone}' references a mesh with multiple instances", path.display())]
    BoneSharedAcrossInstances { path: PathBuf, bone: String },

    /// A bone influences several meshes whose placements carry different
    /// transforms.
    #[error("{}: bone '{bone}' is contained within mesh instances with different world matrices", path.display())]
    BoneInstanceTransformMismatch { path: PathBuf, bone: String },

    /// A component track carries a negative timestamp past the first sample.
    /// Only the first sample may carry the known negative-time export
    /// artifact, which is clamped to zero.
    #[error("{}: animation channel '{channel}' has a negative keyframe time after the first sample", path.display())]
    NegativeKeyframeTime { path: PathBuf, channel: String },
}
