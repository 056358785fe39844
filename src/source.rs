//! Source scene data model
//!
//! The format-agnostic asset graph handed over by the external parser: a tree
//! of named nodes, a flat mesh array with per-vertex attributes and skin data,
//! and flat arrays of materials, animations, cameras and lights. Node identity
//! is the arena index; names are not unique (instanced skeletons repeat them).

use glam::Mat4;

/// Identity of a node inside [`SourceScene::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceNodeIndex(pub u32);

/// A node in the source hierarchy.
#[derive(Debug, Clone)]
pub struct SourceNode {
    /// Node name; may repeat across distinct nodes.
    pub name: String,
    /// Parent node, `None` for the root.
    pub parent: Option<SourceNodeIndex>,
    /// Local transform relative to the parent.
    pub transform: Mat4,
    /// Indices into [`SourceScene::meshes`] attached to this node.
    pub meshes: Vec<u32>,
    /// Child nodes, in source order.
    pub children: Vec<SourceNodeIndex>,
}

/// One face of a source mesh, as indices into the vertex arrays.
///
/// Arbitrary arity at this point; only pure triangle meshes survive import.
#[derive(Debug, Clone)]
pub struct SourceFace {
    pub indices: Vec<u32>,
}

/// A single (vertex, weight) influence declared by a bone.
#[derive(Debug, Clone, Copy)]
pub struct SourceVertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// Skin record of one bone inside a mesh.
#[derive(Debug, Clone)]
pub struct SourceBone {
    /// Name of the node acting as this bone.
    pub name: String,
    /// Local-to-bind-pose matrix, taken verbatim from the source skin data.
    pub offset_matrix: Mat4,
    /// Influences this bone exerts on the mesh's vertices.
    pub weights: Vec<SourceVertexWeight>,
}

/// A mesh as delivered by the parser.
#[derive(Debug, Clone)]
pub struct SourceMesh {
    pub name: String,
    /// Index into [`SourceScene::materials`].
    pub material: u32,
    pub faces: Vec<SourceFace>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// First texture coordinate set; the third component is unused and
    /// expected to be zero.
    pub tex_coords: Option<Vec<[f32; 3]>>,
    pub tangents: Option<Vec<[f32; 3]>>,
    pub bitangents: Option<Vec<[f32; 3]>>,
    /// Skin records; empty for unskinned meshes.
    pub bones: Vec<SourceBone>,
}

impl SourceMesh {
    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }

    /// True when every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.indices.len() == 3)
    }
}

/// A timestamped sample of one animation component track.
#[derive(Debug, Clone, Copy)]
pub struct SourceKey<T> {
    /// Time in ticks; divided by the animation's tick rate at import.
    pub time: f64,
    pub value: T,
}

/// One named node's motion inside an animation clip, split into three
/// independently timed component tracks.
#[derive(Debug, Clone)]
pub struct SourceChannel {
    /// Name of the node this channel drives.
    pub node_name: String,
    pub position_keys: Vec<SourceKey<[f32; 3]>>,
    /// Quaternion keys as `[x, y, z, w]`.
    pub rotation_keys: Vec<SourceKey<[f32; 4]>>,
    pub scale_keys: Vec<SourceKey<[f32; 3]>>,
}

/// An animation clip.
#[derive(Debug, Clone)]
pub struct SourceAnimation {
    pub name: String,
    /// Clip duration in ticks.
    pub duration_ticks: f64,
    /// Declared tick rate; `0.0` means unspecified.
    pub ticks_per_second: f64,
    pub channels: Vec<SourceChannel>,
}

/// A camera record.
#[derive(Debug, Clone)]
pub struct SourceCamera {
    pub name: String,
    pub position: [f32; 3],
    pub up: [f32; 3],
    /// View direction, relative to `position`.
    pub look_at: [f32; 3],
    /// Horizontal field of view in radians.
    pub horizontal_fov: f32,
    /// Aspect ratio; `0.0` means the source did not provide one.
    pub aspect_ratio: f32,
    pub near_clip: f32,
    pub far_clip: f32,
}

/// Light categories recognized in source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLightKind {
    Directional,
    Point,
    Spot,
    /// Anything else (area, ambient, ...); dropped with a warning.
    Other,
}

/// A light record.
#[derive(Debug, Clone)]
pub struct SourceLight {
    pub name: String,
    pub kind: SourceLightKind,
    pub color: [f32; 3],
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub up: [f32; 3],
    /// Inner cone angle in radians (spot lights).
    pub inner_cone_angle: f32,
    /// Outer cone angle in radians (spot lights).
    pub outer_cone_angle: f32,
}

/// Reference to a texture file inside a material.
#[derive(Debug, Clone)]
pub struct SourceTextureRef {
    pub kind: SourceTextureKind,
    /// Path relative to the asset file; may use Windows separators.
    pub path: String,
}

/// Texture categories as classified by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTextureKind {
    Diffuse,
    Specular,
    Emissive,
    Normals,
    Height,
    Displacement,
    MetallicRoughness,
}

/// A material record. Scalar and color properties are transcribed by the
/// scene builder; only the parts the import core acts on appear here.
#[derive(Debug, Clone)]
pub struct SourceMaterial {
    pub name: String,
    pub textures: Vec<SourceTextureRef>,
    pub double_sided: bool,
}

/// The complete parsed asset.
#[derive(Debug, Clone)]
pub struct SourceScene {
    /// Node arena; `root` and the per-node links index into it.
    pub nodes: Vec<SourceNode>,
    pub root: SourceNodeIndex,
    pub meshes: Vec<SourceMesh>,
    pub materials: Vec<SourceMaterial>,
    pub animations: Vec<SourceAnimation>,
    pub cameras: Vec<SourceCamera>,
    pub lights: Vec<SourceLight>,
    /// Count of textures embedded in the asset file. They are not decoded;
    /// a nonzero count only produces a warning.
    pub embedded_texture_count: u32,
}

impl SourceScene {
    pub fn node(&self, index: SourceNodeIndex) -> &SourceNode {
        &self.nodes[index.0 as usize]
    }
}
