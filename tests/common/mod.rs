//! Shared test support: a recording scene builder and source scene fixtures.

use std::path::PathBuf;

use glam::Mat4;
use scene_import::builder::{
    AnimationTrack, MaterialDesc, MaterialId, MeshId, NodeId, ProcessedMesh, SceneBuilder,
    TargetCamera, TargetLight, TargetNode, TextureSlot,
};
use scene_import::source::{
    SourceFace, SourceMaterial, SourceMesh, SourceNode, SourceNodeIndex, SourceScene,
};

/// Builder that records every call for inspection.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    pub nodes: Vec<TargetNode>,
    pub meshes: Vec<ProcessedMesh>,
    pub instances: Vec<(NodeId, MeshId)>,
    pub materials: Vec<MaterialDesc>,
    pub textures: Vec<(MaterialId, TextureSlot, PathBuf)>,
    pub animations: Vec<AnimationTrack>,
    pub cameras: Vec<TargetCamera>,
    pub lights: Vec<TargetLight>,
}

impl RecordingBuilder {
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}

impl SceneBuilder for RecordingBuilder {
    fn add_node(&mut self, node: TargetNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() as u32 - 1)
    }

    fn add_processed_mesh(&mut self, mesh: ProcessedMesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() as u32 - 1)
    }

    fn add_mesh_instance(&mut self, node: NodeId, mesh: MeshId) {
        self.instances.push((node, mesh));
    }

    fn add_material(&mut self, material: MaterialDesc) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    fn load_material_texture(
        &mut self,
        material: MaterialId,
        slot: TextureSlot,
        path: &std::path::Path,
    ) {
        self.textures.push((material, slot, path.to_path_buf()));
    }

    fn add_animation(&mut self, animation: AnimationTrack) {
        self.animations.push(animation);
    }

    fn add_camera(&mut self, camera: TargetCamera) {
        self.cameras.push(camera);
    }

    fn add_light(&mut self, light: TargetLight) {
        self.lights.push(light);
    }

    fn is_node_animated(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.animations.iter().any(|a| a.target == id) {
                return true;
            }
            current = self.nodes[id.0 as usize].parent;
        }
        false
    }
}

/// A scene with a root node and one default material.
pub fn scene() -> SourceScene {
    SourceScene {
        nodes: vec![SourceNode {
            name: "root".to_owned(),
            parent: None,
            transform: Mat4::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }],
        root: SourceNodeIndex(0),
        meshes: Vec::new(),
        materials: vec![SourceMaterial {
            name: "default".to_owned(),
            textures: Vec::new(),
            double_sided: false,
        }],
        animations: Vec::new(),
        cameras: Vec::new(),
        lights: Vec::new(),
        embedded_texture_count: 0,
    }
}

/// Append a node under `parent`.
pub fn add_node(scene: &mut SourceScene, name: &str, parent: SourceNodeIndex) -> SourceNodeIndex {
    let index = SourceNodeIndex(scene.nodes.len() as u32);
    scene.nodes.push(SourceNode {
        name: name.to_owned(),
        parent: Some(parent),
        transform: Mat4::IDENTITY,
        meshes: Vec::new(),
        children: Vec::new(),
    });
    scene.nodes[parent.0 as usize].children.push(index);
    index
}

/// A single-triangle mesh using material 0.
pub fn triangle_mesh(name: &str) -> SourceMesh {
    SourceMesh {
        name: name.to_owned(),
        material: 0,
        faces: vec![SourceFace {
            indices: vec![0, 1, 2],
        }],
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        tex_coords: None,
        tangents: None,
        bitangents: None,
        bones: Vec::new(),
    }
}

/// A single-quad (non-triangle) mesh using material 0.
pub fn quad_mesh(name: &str) -> SourceMesh {
    SourceMesh {
        name: name.to_owned(),
        material: 0,
        faces: vec![SourceFace {
            indices: vec![0, 1, 2, 3],
        }],
        positions: vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        tex_coords: None,
        tangents: None,
        bitangents: None,
        bones: Vec::new(),
    }
}
