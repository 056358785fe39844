//! Mesh preprocessor
//!
//! Turns surviving source meshes into immutable [`ProcessedMesh`]es: flat
//! triangle-list indices, reinterpreted position/normal attributes, 2D
//! texture coordinates, tangents with handedness sign, and normalized bone
//! influences. Processing fans out across meshes with rayon; each task reads
//! only its own mesh and the read-only context. Commits to the builder are
//! then replayed serially in original source order, so mesh IDs stay
//! deterministic and downstream index translation keeps working.

use bytemuck::cast_slice;
use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;
use tracing::warn;

use crate::builder::{
    MeshTopology, ProcessedMesh, SceneBuilder, BONE_ID_NONE, MAX_BONE_INFLUENCES,
};
use crate::context::ImportContext;
use crate::options::ImportOptions;
use crate::source::{SourceMesh, SourceScene};

/// Process all meshes and commit them to the builder.
pub fn create_meshes<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &mut ImportContext,
    builder: &mut B,
    options: &ImportOptions,
) {
    let mut kept: Vec<(u32, &SourceMesh)> = Vec::with_capacity(scene.meshes.len());
    for (index, mesh) in scene.meshes.iter().enumerate() {
        if !mesh.has_faces() {
            warn!("mesh '{}' has no faces, ignoring", mesh.name);
            continue;
        }
        if !mesh.is_triangle_mesh() {
            warn!("mesh '{}' is not a triangle mesh, ignoring", mesh.name);
            continue;
        }
        kept.push((index as u32, mesh));
    }

    // Parallel compute into an index-addressed vector, then serial commit.
    let processed: Vec<(u32, ProcessedMesh)> = {
        let ctx = &*ctx;
        kept.par_iter()
            .map(|&(index, mesh)| (index, process_mesh(mesh, ctx, options)))
            .collect()
    };

    for (index, mesh) in processed {
        let mesh_id = builder.add_processed_mesh(mesh);
        ctx.register_mesh(index, mesh_id);
    }
}

/// Build one renderer-ready mesh. Pure: reads only the mesh's own arrays and
/// the read-only context.
fn process_mesh(mesh: &SourceMesh, ctx: &ImportContext, options: &ImportOptions) -> ProcessedMesh {
    let indices = flatten_indices(mesh);

    // Source and target share the 3-float layout; this is a
    // reinterpretation, not a conversion.
    let positions: Vec<Vec3> = cast_slice(&mesh.positions).to_vec();
    let normals: Vec<Vec3> = cast_slice(&mesh.normals).to_vec();

    let tex_coords = mesh.tex_coords.as_deref().map(build_tex_coords);

    let tangents = if options.use_original_tangent_space {
        match (mesh.tangents.as_deref(), mesh.bitangents.as_deref()) {
            (Some(tangents), Some(bitangents)) => {
                Some(build_tangents(tangents, bitangents, &mesh.normals))
            }
            _ => None,
        }
    } else {
        None
    };

    let (bone_ids, bone_weights) = if mesh.has_bones() {
        let (ids, weights) = load_bone_influences(mesh, ctx);
        (Some(ids), Some(weights))
    } else {
        (None, None)
    };

    ProcessedMesh {
        name: mesh.name.clone(),
        topology: MeshTopology::TriangleList,
        face_count: mesh.faces.len() as u32,
        indices,
        positions,
        normals,
        tex_coords,
        tangents,
        bone_ids,
        bone_weights,
        material: ctx.target_material(mesh.material),
    }
}

/// Flatten per-face index lists into one triangle-list buffer.
fn flatten_indices(mesh: &SourceMesh) -> Vec<u32> {
    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        indices.extend_from_slice(&face.indices);
    }
    indices
}

/// Drop the unused third component of the source texture coordinates.
fn build_tex_coords(source: &[[f32; 3]]) -> Vec<Vec2> {
    source
        .iter()
        .map(|uv| {
            debug_assert_eq!(uv[2], 0.0, "texture coordinate with nonzero third component");
            Vec2::new(uv[0], uv[1])
        })
        .collect()
}

/// Classify each tangent basis as left- or right-handed and store the sign
/// in w. The renderer reconstructs the bitangent at shading time as
/// `cross(normal, tangent.xyz) * tangent.w`, so the sign must agree with the
/// source's orientation convention.
fn build_tangents(tangents: &[[f32; 3]], bitangents: &[[f32; 3]], normals: &[[f32; 3]]) -> Vec<Vec4> {
    tangents
        .iter()
        .zip(bitangents)
        .zip(normals)
        .map(|((t, b), n)| {
            let tangent = Vec3::from_array(*t);
            let bitangent = Vec3::from_array(*b);
            let normal = Vec3::from_array(*n);
            let sign = if normal.cross(tangent).dot(bitangent) >= 0.0 {
                1.0
            } else {
                -1.0
            };
            tangent.normalize().extend(sign)
        })
        .collect()
}

/// Fill up to [`MAX_BONE_INFLUENCES`] (bone ID, weight) slots per vertex and
/// normalize each vertex's weights to sum to 1.
///
/// Influences past the slot limit are dropped with a warning; existing slots
/// are never evicted. A vertex whose declared weights sum to zero keeps its
/// degenerate all-zero slots rather than being renormalized.
fn load_bone_influences(
    mesh: &SourceMesh,
    ctx: &ImportContext,
) -> (Vec<[u32; MAX_BONE_INFLUENCES]>, Vec<[f32; MAX_BONE_INFLUENCES]>) {
    let vertex_count = mesh.positions.len();
    let mut ids = vec![[BONE_ID_NONE; MAX_BONE_INFLUENCES]; vertex_count];
    let mut weights = vec![[0.0f32; MAX_BONE_INFLUENCES]; vertex_count];

    for bone in &mesh.bones {
        let Some(bone_id) = ctx.target_node_by_name(&bone.name, 0) else {
            warn!(
                "mesh '{}': bone '{}' has no node in the scene graph, ignoring its influences",
                mesh.name, bone.name
            );
            continue;
        };

        for influence in &bone.weights {
            if influence.weight == 0.0 {
                continue;
            }

            let vertex = influence.vertex as usize;
            let slot = ids[vertex].iter().position(|&id| id == BONE_ID_NONE);
            match slot {
                Some(slot) => {
                    ids[vertex][slot] = bone_id.0;
                    weights[vertex][slot] = influence.weight;
                }
                None => {
                    warn!(
                        "mesh '{}': vertex {} has too many bone influences, dropping \
                         the influence of bone '{}'; the animation might not look correct",
                        mesh.name, influence.vertex, bone.name
                    );
                }
            }
        }
    }

    // Some assets carry weights that sum above (or below) 1.
    for vertex_weights in &mut weights {
        let total: f32 = vertex_weights.iter().sum();
        if total != 0.0 {
            for weight in vertex_weights.iter_mut() {
                *weight /= total;
            }
        }
    }

    (ids, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeId;
    use crate::source::{SourceBone, SourceNodeIndex, SourceVertexWeight};
    use crate::test_support::triangle_mesh;
    use glam::Mat4;

    fn ctx_with_bones(names: &[&str]) -> ImportContext {
        let mut ctx = ImportContext::default();
        for (i, name) in names.iter().enumerate() {
            ctx.register_node(SourceNodeIndex(i as u32), name, NodeId(i as u32));
        }
        ctx
    }

    fn bone(name: &str, weights: &[(u32, f32)]) -> SourceBone {
        SourceBone {
            name: name.to_owned(),
            offset_matrix: Mat4::IDENTITY,
            weights: weights
                .iter()
                .map(|&(vertex, weight)| SourceVertexWeight { vertex, weight })
                .collect(),
        }
    }

    #[test]
    fn test_indices_flatten_in_face_order() {
        let mesh = triangle_mesh("tri");
        assert_eq!(flatten_indices(&mesh), vec![0, 1, 2]);
    }

    #[test]
    fn test_tex_coords_drop_third_component() {
        let coords = build_tex_coords(&[[0.25, 0.75, 0.0], [1.0, 0.0, 0.0]]);
        assert_eq!(coords, vec![Vec2::new(0.25, 0.75), Vec2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_tangent_sign_classifies_handedness() {
        let normals = [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]];
        let tangents = [[2.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        // First basis right-handed (bitangent = +Y), second flipped.
        let bitangents = [[0.0, 1.0, 0.0], [0.0, -1.0, 0.0]];

        let out = build_tangents(&tangents, &bitangents, &normals);
        assert_eq!(out[0], Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(out[1], Vec4::new(1.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn test_weights_normalize_to_one() {
        let ctx = ctx_with_bones(&["a", "b"]);
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("a", &[(0, 2.0)]), bone("b", &[(0, 6.0)])];

        let (ids, weights) = load_bone_influences(&mesh, &ctx);
        assert_eq!(ids[0][0], 0);
        assert_eq!(ids[0][1], 1);
        assert!((weights[0][0] - 0.25).abs() < 1e-6);
        assert!((weights[0][1] - 0.75).abs() < 1e-6);
        assert!((weights[0].iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_weights_are_skipped() {
        let ctx = ctx_with_bones(&["a"]);
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("a", &[(0, 0.0), (1, 1.0)])];

        let (ids, weights) = load_bone_influences(&mesh, &ctx);
        assert_eq!(ids[0], [BONE_ID_NONE; MAX_BONE_INFLUENCES]);
        assert_eq!(weights[0], [0.0; MAX_BONE_INFLUENCES]);
        assert_eq!(ids[1][0], 0);
        assert_eq!(weights[1][0], 1.0);
    }

    #[test]
    fn test_overfull_vertex_keeps_existing_slots() {
        let ctx = ctx_with_bones(&["a", "b", "c", "d", "e"]);
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = (0..5)
            .map(|i| bone(["a", "b", "c", "d", "e"][i], &[(0, 0.2)]))
            .collect();

        let (ids, weights) = load_bone_influences(&mesh, &ctx);
        // Fifth influence dropped, first four kept and renormalized.
        assert_eq!(ids[0], [0, 1, 2, 3]);
        for weight in weights[0] {
            assert!((weight - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_sum_vertex_stays_degenerate() {
        let ctx = ctx_with_bones(&["a"]);
        let mut mesh = triangle_mesh("skinned");
        // Vertex 2 gets no influence at all.
        mesh.bones = vec![bone("a", &[(0, 1.0), (1, 1.0)])];

        let (_, weights) = load_bone_influences(&mesh, &ctx);
        assert_eq!(weights[2], [0.0; MAX_BONE_INFLUENCES]);
    }

    #[test]
    fn test_unresolvable_bone_is_ignored() {
        let ctx = ctx_with_bones(&["a"]);
        let mut mesh = triangle_mesh("skinned");
        mesh.bones = vec![bone("ghost", &[(0, 1.0)]), bone("a", &[(0, 1.0)])];

        let (ids, weights) = load_bone_influences(&mesh, &ctx);
        assert_eq!(ids[0][0], 0);
        assert_eq!(weights[0][0], 1.0);
        assert_eq!(ids[0][1], BONE_ID_NONE);
    }
}
