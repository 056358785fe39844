//! Shared fixtures for unit tests.

use glam::Mat4;

use crate::source::{SourceFace, SourceMesh, SourceNode, SourceNodeIndex, SourceScene};

/// A scene with a single empty root node named "root".
pub fn empty_scene() -> SourceScene {
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
        materials: Vec::new(),
        animations: Vec::new(),
        cameras: Vec::new(),
        lights: Vec::new(),
        embedded_texture_count: 0,
    }
}

/// Append a node to the scene, linked under `parent`.
pub fn node(name: &str, parent: Option<SourceNodeIndex>, scene: &mut SourceScene) -> SourceNodeIndex {
    let index = SourceNodeIndex(scene.nodes.len() as u32);
    scene.nodes.push(SourceNode {
        name: name.to_owned(),
        parent,
        transform: Mat4::IDENTITY,
        meshes: Vec::new(),
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        scene.nodes[parent.0 as usize].children.push(index);
    }
    index
}

/// A minimal single-triangle mesh with three vertices and material 0.
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
