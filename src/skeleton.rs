//! Skeleton binder
//!
//! Collects every mesh's skin records into the bone bind table and validates
//! the single-placement invariant: each mesh a bone influences must appear
//! exactly once in the graph, and all meshes sharing a bone must be placed
//! with the same transform. Skinning later subtracts one world matrix per
//! bone, so either violation makes the downstream math unsound and aborts
//! the import.

use glam::Mat4;
use hashbrown::HashMap;

use crate::error::ImportError;
use crate::options::ImportOptions;
use crate::source::{SourceNodeIndex, SourceScene};

/// Build the bone-name → local-to-bind-pose table from all meshes' skin
/// records. Matrices are taken verbatim from the source; nothing is
/// recomputed. Runs before the graph walk so node creation can attach bind
/// poses.
pub fn collect_bind_poses(scene: &SourceScene) -> HashMap<String, Mat4> {
    let mut bind_poses = HashMap::new();
    for mesh in &scene.meshes {
        for bone in &mesh.bones {
            bind_poses.insert(bone.name.clone(), bone.offset_matrix);
        }
    }
    bind_poses
}

/// Bone name → positions of the meshes it influences.
fn collect_bone_meshes(scene: &SourceScene) -> HashMap<&str, Vec<u32>> {
    let mut bone_meshes: HashMap<&str, Vec<u32>> = HashMap::new();
    for (mesh_index, mesh) in scene.meshes.iter().enumerate() {
        for bone in &mesh.bones {
            bone_meshes
                .entry(bone.name.as_str())
                .or_default()
                .push(mesh_index as u32);
        }
    }
    bone_meshes
}

/// Mesh position → graph nodes the mesh is attached to, in traversal order.
fn collect_mesh_placements(scene: &SourceScene) -> Vec<Vec<SourceNodeIndex>> {
    let mut placements = vec![Vec::new(); scene.meshes.len()];
    let mut stack = vec![scene.root];
    while let Some(index) = stack.pop() {
        let node = scene.node(index);
        for &mesh in &node.meshes {
            placements[mesh as usize].push(index);
        }
        // Children pushed in reverse so traversal order matches the walk.
        for &child in node.children.iter().rev() {
            stack.push(child);
        }
    }
    placements
}

/// Validate the whole asset's bones up front, before anything is committed
/// to the target scene.
pub fn validate_bones(scene: &SourceScene, options: &ImportOptions) -> Result<(), ImportError> {
    let bone_meshes = collect_bone_meshes(scene);
    let placements = collect_mesh_placements(scene);

    let mut bones: Vec<&str> = bone_meshes.keys().copied().collect();
    bones.sort_unstable();

    for bone in bones {
        let meshes = &bone_meshes[bone];
        for (i, &mesh) in meshes.iter().enumerate() {
            let nodes = &placements[mesh as usize];
            if nodes.len() != 1 {
                return Err(ImportError::BoneSharedAcrossInstances {
                    path: options.path.clone(),
                    bone: bone.to_owned(),
                });
            }
            if i > 0 {
                let previous = placements[meshes[i - 1] as usize][0];
                let current_transform = scene.node(nodes[0]).transform;
                if scene.node(previous).transform != current_transform {
                    return Err(ImportError::BoneInstanceTransformMismatch {
                        path: options.path.clone(),
                        bone: bone.to_owned(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceBone, SourceVertexWeight};
    use crate::test_support::{empty_scene, node, triangle_mesh};

    fn bone(name: &str) -> SourceBone {
        SourceBone {
            name: name.to_owned(),
            offset_matrix: Mat4::from_translation(glam::Vec3::X),
            weights: vec![SourceVertexWeight {
                vertex: 0,
                weight: 1.0,
            }],
        }
    }

    #[test]
    fn test_bind_table_collects_every_bone() {
        let mut scene = empty_scene();
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("hip"), bone("knee")];
        scene.meshes.push(mesh);
        scene.nodes[0].meshes.push(0);

        let table = collect_bind_poses(&scene);
        assert_eq!(table.len(), 2);
        assert_eq!(table["hip"], Mat4::from_translation(glam::Vec3::X));
    }

    #[test]
    fn test_single_placement_passes() {
        let mut scene = empty_scene();
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("hip")];
        scene.meshes.push(mesh);
        let carrier = node("carrier", Some(scene.root), &mut scene);
        scene.nodes[carrier.0 as usize].meshes.push(0);

        assert!(validate_bones(&scene, &ImportOptions::default()).is_ok());
    }

    #[test]
    fn test_multiply_placed_skinned_mesh_fails() {
        let mut scene = empty_scene();
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("hip")];
        scene.meshes.push(mesh);
        let a = node("a", Some(scene.root), &mut scene);
        let b = node("b", Some(scene.root), &mut scene);
        scene.nodes[a.0 as usize].meshes.push(0);
        scene.nodes[b.0 as usize].meshes.push(0);

        let err = validate_bones(&scene, &ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::BoneSharedAcrossInstances { bone, .. } if bone == "hip"
        ));
    }

    #[test]
    fn test_shared_bone_with_differing_transforms_fails() {
        let mut scene = empty_scene();
        for name in ["left", "right"] {
            let mut mesh = triangle_mesh(name);
            mesh.bones = vec![bone("hip")];
            scene.meshes.push(mesh);
        }
        let a = node("a", Some(scene.root), &mut scene);
        let b = node("b", Some(scene.root), &mut scene);
        scene.nodes[a.0 as usize].meshes.push(0);
        scene.nodes[b.0 as usize].meshes.push(1);
        scene.nodes[b.0 as usize].transform = Mat4::from_translation(glam::Vec3::Y);

        let err = validate_bones(&scene, &ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::BoneInstanceTransformMismatch { bone, .. } if bone == "hip"
        ));
    }

    #[test]
    fn test_shared_bone_with_matching_transforms_passes() {
        let mut scene = empty_scene();
        for name in ["left", "right"] {
            let mut mesh = triangle_mesh(name);
            mesh.bones = vec![bone("hip")];
            scene.meshes.push(mesh);
        }
        let a = node("a", Some(scene.root), &mut scene);
        let b = node("b", Some(scene.root), &mut scene);
        scene.nodes[a.0 as usize].meshes.push(0);
        scene.nodes[b.0 as usize].meshes.push(1);

        assert!(validate_bones(&scene, &ImportOptions::default()).is_ok());
    }
}
