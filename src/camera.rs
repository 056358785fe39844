//! Camera adapter
//!
//! Stateless per-record conversion. A camera whose name matches a graph node
//! gets a synthetic child node holding its base transform, so animating the
//! parent moves the camera; otherwise the camera stays static and
//! unattached.

use glam::Vec3;

use crate::builder::{SceneBuilder, TargetCamera, TargetNode};
use crate::context::ImportContext;
use crate::options::{ImportOptions, SourceFormat};
use crate::source::{SourceCamera, SourceScene};

/// Used when the source does not provide an aspect ratio.
const DEFAULT_ASPECT_RATIO: f32 = 1.7777;

/// Fixed focal length for legacy formats whose FOV data is unreliable.
const LEGACY_FOCAL_LENGTH_MM: f32 = 35.0;

/// Film-gate height the focal length is expressed against.
const FRAME_HEIGHT_MM: f32 = 24.0;

/// Focal length of a pinhole camera with vertical field of view `fov_y`
/// (radians) on a film gate of `frame_height` millimeters.
fn fov_y_to_focal_length(fov_y: f32, frame_height: f32) -> f32 {
    frame_height / (2.0 * (fov_y / 2.0).tan())
}

/// Convert all camera records.
pub fn create_cameras<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &ImportContext,
    builder: &mut B,
    options: &ImportOptions,
) {
    for camera in &scene.cameras {
        create_camera(camera, ctx, builder, options);
    }
}

fn create_camera<B: SceneBuilder>(
    camera: &SourceCamera,
    ctx: &ImportContext,
    builder: &mut B,
    options: &ImportOptions,
) {
    let position = Vec3::from_array(camera.position);
    let up = Vec3::from_array(camera.up);
    let target = position + Vec3::from_array(camera.look_at);

    let aspect_ratio = if camera.aspect_ratio != 0.0 {
        camera.aspect_ratio
    } else {
        DEFAULT_ASPECT_RATIO
    };
    // Only glTF reports a FOV precise enough to derive the focal length
    // from; everything else keeps the fixed legacy value.
    let focal_length = if options.source_format == SourceFormat::Gltf2 {
        fov_y_to_focal_length(camera.horizontal_fov / aspect_ratio, FRAME_HEIGHT_MM)
    } else {
        LEGACY_FOCAL_LENGTH_MM
    };

    let (node, animated) = match ctx.target_node_by_name(&camera.name, 0) {
        Some(anchor) => {
            let mut base = glam::Mat4::look_at_rh(position, target, up);
            // glTF already uses the -Z view direction convention.
            if options.source_format != SourceFormat::Gltf2 {
                base.z_axis = -base.z_axis;
            }
            let node = builder.add_node(TargetNode {
                name: format!("{}.base", camera.name),
                parent: Some(anchor),
                transform: base,
                local_to_bind_pose: glam::Mat4::IDENTITY,
            });
            (Some(node), builder.is_node_animated(node))
        }
        None => (None, false),
    };

    builder.add_camera(TargetCamera {
        name: camera.name.clone(),
        position,
        target,
        up,
        aspect_ratio,
        focal_length,
        near_clip: camera.near_clip,
        far_clip: camera.far_clip,
        node,
        animated,
    });
}
