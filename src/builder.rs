//! Target scene surface
//!
//! Dense integer IDs and the [`SceneBuilder`] trait through which the import
//! feeds the renderer-owned scene model. The builder allocates IDs append-only
//! and owns all final buffers; the import core never stores source handles in
//! target-side data.

use std::path::Path;

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Dense ID of a node in the target scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense ID of a processed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Dense ID of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Maximum bone influences stored per vertex.
pub const MAX_BONE_INFLUENCES: usize = 4;

/// Sentinel for an unused bone influence slot.
pub const BONE_ID_NONE: u32 = u32::MAX;

/// A node to be appended to the target scene graph.
#[derive(Debug, Clone)]
pub struct TargetNode {
    pub name: String,
    /// Parent ID, `None` for the root.
    pub parent: Option<NodeId>,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    /// Bind-pose matrix; identity unless the node is a bone.
    pub local_to_bind_pose: Mat4,
}

/// Primitive topology of a processed mesh. Non-triangle meshes are rejected
/// before processing, so only one variant exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshTopology {
    TriangleList,
}

/// An immutable, renderer-ready mesh produced by the preprocessor.
///
/// Per-vertex bone weights, when present, sum to 1 after normalization except
/// for the degenerate case of a vertex with no nonzero influence at all, which
/// keeps its all-zero slots.
#[derive(Debug, Clone)]
pub struct ProcessedMesh {
    pub name: String,
    pub topology: MeshTopology,
    pub face_count: u32,
    /// Flat triangle-list index buffer.
    pub indices: Vec<u32>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Option<Vec<Vec2>>,
    /// Tangent xyz plus handedness sign in w.
    pub tangents: Option<Vec<Vec4>>,
    /// Up to [`MAX_BONE_INFLUENCES`] target node IDs per vertex; unused slots
    /// hold [`BONE_ID_NONE`].
    pub bone_ids: Option<Vec<[u32; MAX_BONE_INFLUENCES]>>,
    pub bone_weights: Option<Vec<[f32; MAX_BONE_INFLUENCES]>>,
    pub material: MaterialId,
}

/// One keyframe of a merged animation track. Components not sampled at this
/// instant carry the previous keyframe's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Absolute time in seconds.
    pub time: f64,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            time: 0.0,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A merged animation track targeting one node instance.
#[derive(Debug, Clone)]
pub struct AnimationTrack {
    pub name: String,
    pub target: NodeId,
    /// Clip duration in seconds.
    pub duration: f64,
    /// Keyframes in strictly increasing time order.
    pub keyframes: Vec<Keyframe>,
}

/// A camera entity.
#[derive(Debug, Clone)]
pub struct TargetCamera {
    pub name: String,
    pub position: Vec3,
    /// Point the camera looks at, in the same space as `position`.
    pub target: Vec3,
    pub up: Vec3,
    pub aspect_ratio: f32,
    /// Focal length in millimeters.
    pub focal_length: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Synthetic base-transform node, when the camera is anchored to the
    /// scene graph.
    pub node: Option<NodeId>,
    pub animated: bool,
}

/// Shape-specific light parameters.
#[derive(Debug, Clone)]
pub enum TargetLightKind {
    Directional {
        direction: Vec3,
    },
    /// Point and spot lights; a pure point light has a full opening angle.
    Point {
        position: Vec3,
        direction: Vec3,
        /// Full cone opening angle in radians.
        opening_angle: f32,
        /// Angular width of the soft cone edge in radians.
        penumbra_angle: f32,
    },
}

/// A light entity.
#[derive(Debug, Clone)]
pub struct TargetLight {
    pub name: String,
    pub intensity: Vec3,
    pub kind: TargetLightKind,
    /// Synthetic base-transform node, when the light is anchored to the
    /// scene graph.
    pub node: Option<NodeId>,
    pub animated: bool,
}

/// Shading model selected for a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    MetalRough,
    SpecGloss,
}

/// Texture slots of the target material model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    BaseColor,
    Specular,
    Emissive,
    Normal,
}

/// Material description handed to the builder. Scalar and color properties
/// are transcribed separately by the builder; the import core only decides
/// identity, shading model and sidedness.
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    pub name: String,
    pub shading_model: ShadingModel,
    pub double_sided: bool,
}

/// Mutation surface of the renderer-owned scene model.
///
/// IDs are dense and append-only: the Nth call of an `add_*` method returns
/// ID N. Implementations own every buffer passed in; nothing is retained by
/// the import core after a call returns.
pub trait SceneBuilder {
    fn add_node(&mut self, node: TargetNode) -> NodeId;

    fn add_processed_mesh(&mut self, mesh: ProcessedMesh) -> MeshId;

    /// Bind one placement of a mesh to a graph node.
    fn add_mesh_instance(&mut self, node: NodeId, mesh: MeshId);

    fn add_material(&mut self, material: MaterialDesc) -> MaterialId;

    /// Load `path` into the given texture slot. Path resolution and file I/O
    /// are the builder's concern; the import core only normalizes separators
    /// and joins the asset's directory.
    fn load_material_texture(&mut self, material: MaterialId, slot: TextureSlot, path: &Path);

    fn add_animation(&mut self, animation: AnimationTrack);

    fn add_camera(&mut self, camera: TargetCamera);

    fn add_light(&mut self, light: TargetLight);

    /// True when `node` or any of its ancestors is targeted by a previously
    /// added animation track.
    fn is_node_animated(&self, node: NodeId) -> bool;
}
