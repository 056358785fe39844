//! Scene graph walker and mesh instancer
//!
//! The walk is the one place target node IDs are minted: a depth-first
//! pre-order traversal of the source tree, creating one target node per
//! source node in traversal order. Re-running an import on an unchanged
//! asset therefore yields identical IDs. The instancer walks the same tree a
//! second time, after meshes are committed, and binds mesh placements to the
//! nodes (expanding explicit instance transforms into extra child nodes).

use glam::Mat4;

use crate::builder::{SceneBuilder, TargetNode};
use crate::context::ImportContext;
use crate::source::{SourceNodeIndex, SourceScene};

/// Mirror the source hierarchy into the target scene graph, attaching
/// bind-pose matrices to bone nodes.
pub fn build_scene_graph<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &mut ImportContext,
    builder: &mut B,
) {
    let root = scene.node(scene.root);
    assert!(
        !ctx.is_bone(&root.name),
        "scene root '{}' is a bone",
        root.name
    );
    add_node(scene, ctx, builder, scene.root);
}

fn add_node<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &mut ImportContext,
    builder: &mut B,
    index: SourceNodeIndex,
) {
    let source = scene.node(index);
    let is_bone = ctx.is_bone(&source.name);
    // Bones and renderable meshes are disjoint node categories.
    assert!(
        !is_bone || source.meshes.is_empty(),
        "bone node '{}' has meshes attached",
        source.name
    );

    let parent = source.parent.map(|parent| ctx.target_node(parent));
    let target = builder.add_node(TargetNode {
        name: source.name.clone(),
        parent,
        transform: source.transform,
        local_to_bind_pose: ctx.local_to_bind_pose(&source.name),
    });
    // Register before descending so children can resolve their parent.
    ctx.register_node(index, &source.name, target);

    for &child in &source.children {
        add_node(scene, ctx, builder, child);
    }
}

/// Bind processed meshes to the graph, one placement per instance transform.
///
/// With no explicit instance list every node-mesh pair gets exactly one
/// binding on the node itself. With a list, each non-identity transform gets
/// its own child node; identity transforms bind directly. Meshes dropped by
/// the preprocessor have no target ID and contribute nothing.
pub fn add_mesh_instances<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &ImportContext,
    builder: &mut B,
    instances: &[Mat4],
) {
    add_instances_for_node(scene, ctx, builder, scene.root, instances);
}

fn add_instances_for_node<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &ImportContext,
    builder: &mut B,
    index: SourceNodeIndex,
    instances: &[Mat4],
) {
    let source = scene.node(index);
    let node_id = ctx.target_node(index);

    for &mesh_index in &source.meshes {
        let Some(mesh_id) = ctx.target_mesh(mesh_index) else {
            // Dropped at preprocessing; already warned there.
            continue;
        };

        if instances.is_empty() {
            builder.add_mesh_instance(node_id, mesh_id);
            continue;
        }

        for (instance, transform) in instances.iter().enumerate() {
            let instance_node = if *transform == Mat4::IDENTITY {
                node_id
            } else {
                builder.add_node(TargetNode {
                    name: format!("node{node_id}.instance{instance}"),
                    parent: Some(node_id),
                    transform: *transform,
                    local_to_bind_pose: Mat4::IDENTITY,
                })
            };
            builder.add_mesh_instance(instance_node, mesh_id);
        }
    }

    for &child in &source.children {
        add_instances_for_node(scene, ctx, builder, child, instances);
    }
}
