//! Light adapter
//!
//! Directional lights keep only a direction; point and spot lights share one
//! representation with cone angles. Like cameras, a light whose name matches
//! a graph node gets a synthetic child node carrying its base transform.

use glam::{Mat4, Vec3};
use tracing::warn;

use crate::builder::{SceneBuilder, TargetLight, TargetLightKind, TargetNode};
use crate::context::ImportContext;
use crate::source::{SourceLight, SourceLightKind, SourceScene};

/// Convert all light records. Unsupported light kinds are skipped.
pub fn create_lights<B: SceneBuilder>(
    scene: &SourceScene,
    ctx: &ImportContext,
    builder: &mut B,
) {
    for light in &scene.lights {
        match light.kind {
            SourceLightKind::Directional => create_directional_light(light, ctx, builder),
            SourceLightKind::Point | SourceLightKind::Spot => {
                create_point_light(light, ctx, builder)
            }
            SourceLightKind::Other => {
                warn!("light '{}' has an unsupported type, ignoring", light.name);
            }
        }
    }
}

fn create_directional_light<B: SceneBuilder>(
    light: &SourceLight,
    ctx: &ImportContext,
    builder: &mut B,
) {
    let direction = Vec3::from_array(light.direction).normalize();

    let mut base = Mat4::IDENTITY;
    base.z_axis = (-direction).extend(0.0);

    add_light_common(
        light,
        TargetLightKind::Directional { direction },
        base,
        ctx,
        builder,
    );
}

fn create_point_light<B: SceneBuilder>(
    light: &SourceLight,
    ctx: &ImportContext,
    builder: &mut B,
) {
    let position = Vec3::from_array(light.position);
    let direction = Vec3::from_array(light.direction);
    let up = Vec3::from_array(light.up);

    // Some glTF exports report zero vectors here.
    let direction = if direction.length() == 0.0 {
        Vec3::NEG_Z
    } else {
        direction.normalize()
    };
    let up = if up.length() == 0.0 { Vec3::Y } else { up.normalize() };

    let right = direction.cross(up);
    let base = Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        (-direction).extend(0.0),
        position.extend(1.0),
    );

    add_light_common(
        light,
        TargetLightKind::Point {
            position,
            direction,
            opening_angle: light.outer_cone_angle,
            penumbra_angle: light.outer_cone_angle - light.inner_cone_angle,
        },
        base,
        ctx,
        builder,
    );
}

fn add_light_common<B: SceneBuilder>(
    light: &SourceLight,
    kind: TargetLightKind,
    base: Mat4,
    ctx: &ImportContext,
    builder: &mut B,
) {
    let (node, animated) = match ctx.target_node_by_name(&light.name, 0) {
        Some(anchor) => {
            let node = builder.add_node(TargetNode {
                name: format!("{}.base", light.name),
                parent: Some(anchor),
                transform: base,
                local_to_bind_pose: Mat4::IDENTITY,
            });
            (Some(node), true)
        }
        None => (None, false),
    };

    builder.add_light(TargetLight {
        name: light.name.clone(),
        intensity: Vec3::from_array(light.color),
        kind,
        node,
        animated,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_zero_vectors_fall_back_to_conventions() {
        let direction = Vec3::ZERO;
        let fallback = if direction.length() == 0.0 {
            Vec3::NEG_Z
        } else {
            direction.normalize()
        };
        assert_eq!(fallback, Vec3::NEG_Z);
    }

    #[test]
    fn test_point_light_base_matrix_columns() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::NEG_Z;
        let up = Vec3::Y;
        let right = direction.cross(up);

        let base = Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            (-direction).extend(0.0),
            position.extend(1.0),
        );
        assert_eq!(base.x_axis, Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(base.z_axis, Vec4::new(0.0, 0.0, 1.0, 0.0));
        assert_eq!(base.w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }
}
