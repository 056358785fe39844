//! Import context
//!
//! The explicit mutable state threaded through the import phases: the
//! bidirectional source-identity / target-ID correspondence, the bone bind
//! table, and the source-index → target-ID maps for meshes and materials.
//! Each table has a bounded write window (built once by one phase, read-only
//! afterwards); nothing here owns target-side data.

use glam::Mat4;
use hashbrown::HashMap;

use crate::builder::{MaterialId, MeshId, NodeId};
use crate::source::SourceNodeIndex;

#[derive(Debug, Default)]
pub struct ImportContext {
    /// Source identity → target ID. One-to-one; written only by the graph
    /// walk.
    node_ids: HashMap<SourceNodeIndex, NodeId>,
    /// Name → source identities sharing it, in traversal order.
    nodes_by_name: HashMap<String, Vec<SourceNodeIndex>>,
    /// Bone name → local-to-bind-pose matrix. A name present here denotes a
    /// bone; such nodes carry no meshes.
    bind_poses: HashMap<String, Mat4>,
    /// Original source mesh position → target mesh ID. Dropped meshes have
    /// no entry.
    mesh_ids: HashMap<u32, MeshId>,
    /// Source material index → target material ID.
    materials: Vec<MaterialId>,
}

impl ImportContext {
    /// Record the target ID minted for a source node. Every node is
    /// registered exactly once, before any lookup on it; registering twice is
    /// an importer bug.
    pub fn register_node(&mut self, source: SourceNodeIndex, name: &str, target: NodeId) {
        let previous = self.node_ids.insert(source, target);
        assert!(
            previous.is_none(),
            "source node {} registered twice",
            source.0
        );
        self.nodes_by_name
            .entry(name.to_owned())
            .or_default()
            .push(source);
    }

    /// Target ID of a registered source node.
    ///
    /// # Panics
    /// If the node was never registered; lookups only happen after the graph
    /// walk, so a miss is an importer bug, not an asset problem.
    pub fn target_node(&self, source: SourceNodeIndex) -> NodeId {
        match self.node_ids.get(&source) {
            Some(id) => *id,
            None => panic!("lookup of unregistered source node {}", source.0),
        }
    }

    /// Target ID of the `instance`th source node named `name`, or `None` when
    /// the asset has no such binding.
    pub fn target_node_by_name(&self, name: &str, instance: usize) -> Option<NodeId> {
        let sources = self.nodes_by_name.get(name)?;
        sources.get(instance).map(|source| self.target_node(*source))
    }

    /// Number of source nodes sharing `name`.
    pub fn instance_count(&self, name: &str) -> usize {
        self.nodes_by_name.get(name).map_or(0, |nodes| nodes.len())
    }

    /// Install the bone bind table. Called once, before the graph walk.
    pub fn set_bind_poses(&mut self, bind_poses: HashMap<String, Mat4>) {
        self.bind_poses = bind_poses;
    }

    /// Whether `name` denotes a bone.
    pub fn is_bone(&self, name: &str) -> bool {
        self.bind_poses.contains_key(name)
    }

    /// Local-to-bind-pose matrix for `name`; identity for non-bones.
    pub fn local_to_bind_pose(&self, name: &str) -> Mat4 {
        self.bind_poses.get(name).copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Record the target ID of the mesh at original source position
    /// `source_index`.
    pub fn register_mesh(&mut self, source_index: u32, target: MeshId) {
        self.mesh_ids.insert(source_index, target);
    }

    /// Target ID of a source mesh, `None` when the mesh was dropped.
    pub fn target_mesh(&self, source_index: u32) -> Option<MeshId> {
        self.mesh_ids.get(&source_index).copied()
    }

    /// Record the target material IDs, indexed by source material position.
    pub fn set_materials(&mut self, materials: Vec<MaterialId>) {
        self.materials = materials;
    }

    /// Target ID of a source material.
    pub fn target_material(&self, source_index: u32) -> MaterialId {
        self.materials[source_index as usize]
    }
}
