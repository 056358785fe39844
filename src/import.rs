//! Import orchestration
//!
//! A single coordinating pass drives all phases in a fixed order. Skeleton
//! data is collected before the graph walk so node creation can attach bind
//! poses; mesh IDs and node IDs exist before instancing; animations, cameras
//! and lights run last because they resolve node references by name. Only the
//! per-mesh compute step runs in parallel; every target-side mutation happens
//! on this thread.

use tracing::{debug, warn};

use crate::builder::SceneBuilder;
use crate::context::ImportContext;
use crate::error::ImportError;
use crate::options::ImportOptions;
use crate::source::SourceScene;
use crate::{animation, camera, graph, light, material, mesh, skeleton};

fn validate_scene(scene: &SourceScene, options: &ImportOptions) -> Result<(), ImportError> {
    if scene.embedded_texture_count > 0 {
        warn!(
            "scene has {} embedded textures, which are not loaded",
            scene.embedded_texture_count
        );
    }
    skeleton::validate_bones(scene, options)
}

/// Convert a parsed source scene into the target scene model.
///
/// One-shot and deterministic: a fixed input yields identical target IDs on
/// every run. On error the builder may hold the output of completed phases,
/// but never a partially committed phase.
pub fn import<B: SceneBuilder>(
    scene: &SourceScene,
    builder: &mut B,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    validate_scene(scene, options)?;
    debug!("scene validated");

    let mut ctx = ImportContext::default();

    ctx.set_materials(material::create_materials(scene, builder, options));
    debug!("materials created");

    ctx.set_bind_poses(skeleton::collect_bind_poses(scene));
    graph::build_scene_graph(scene, &mut ctx, builder);
    debug!("scene graph created");

    mesh::create_meshes(scene, &mut ctx, builder, options);
    graph::add_mesh_instances(scene, &ctx, builder, &options.instances);
    debug!("meshes created");

    animation::create_animations(scene, &ctx, builder, options)?;
    debug!("animations created");

    camera::create_cameras(scene, &ctx, builder, options);
    light::create_lights(scene, &ctx, builder);
    debug!("cameras and lights created");

    Ok(())
}
