//! scene-import
//!
//! Converts an externally-parsed, format-agnostic 3D scene — a tree of named
//! nodes, meshes with vertex attributes and skeletal bone weights, animation
//! channels, cameras and lights — into a renderer-ready scene model with its
//! own dense node-ID space, deterministic mesh ordering and a skeletal
//! binding that assumes a single placement per skinned mesh.
//!
//! The asset parser is a black box upstream of this crate (it hands over a
//! [`source::SourceScene`]); the renderer-side storage is a black box
//! downstream (it implements [`builder::SceneBuilder`]). The crate itself
//! performs no file I/O: the whole import is a bounded, CPU-bound batch
//! computation, parallel only across independent meshes.

pub mod animation;
pub mod builder;
pub mod camera;
pub mod context;
pub mod error;
pub mod graph;
pub mod import;
pub mod light;
pub mod material;
pub mod mesh;
pub mod options;
pub mod skeleton;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{
    AnimationTrack, Keyframe, MaterialDesc, MaterialId, MeshId, MeshTopology, NodeId,
    ProcessedMesh, SceneBuilder, ShadingModel, TargetCamera, TargetLight, TargetLightKind,
    TargetNode, TextureSlot, BONE_ID_NONE, MAX_BONE_INFLUENCES,
};
pub use error::ImportError;
pub use import::import;
pub use options::{ImportOptions, SourceFormat};
pub use source::SourceScene;
