//! Material pass
//!
//! Decides material identity, shading model and sidedness, and feeds texture
//! references through the per-format slot mapping tables. Scalar and color
//! property transcription is the scene builder's concern and happens outside
//! this core.

use std::path::Path;

use tracing::warn;

use crate::builder::{MaterialDesc, MaterialId, SceneBuilder, ShadingModel, TextureSlot};
use crate::options::{ImportOptions, SourceFormat};
use crate::source::{SourceMaterial, SourceScene, SourceTextureKind};

/// Source texture category → target slot, per format family.
///
/// OBJ has no normal map of its own, so bump and displacement maps land in
/// the normal slot. glTF additionally exposes a combined metallic-roughness
/// texture, mapped to the specular slot.
fn texture_mappings(format: SourceFormat) -> &'static [(SourceTextureKind, TextureSlot)] {
    match format {
        SourceFormat::Default => &[
            (SourceTextureKind::Diffuse, TextureSlot::BaseColor),
            (SourceTextureKind::Specular, TextureSlot::Specular),
            (SourceTextureKind::Emissive, TextureSlot::Emissive),
            (SourceTextureKind::Normals, TextureSlot::Normal),
        ],
        SourceFormat::Obj => &[
            (SourceTextureKind::Diffuse, TextureSlot::BaseColor),
            (SourceTextureKind::Specular, TextureSlot::Specular),
            (SourceTextureKind::Emissive, TextureSlot::Emissive),
            (SourceTextureKind::Height, TextureSlot::Normal),
            (SourceTextureKind::Displacement, TextureSlot::Normal),
        ],
        SourceFormat::Gltf2 => &[
            (SourceTextureKind::Diffuse, TextureSlot::BaseColor),
            (SourceTextureKind::Emissive, TextureSlot::Emissive),
            (SourceTextureKind::Normals, TextureSlot::Normal),
            (SourceTextureKind::MetallicRoughness, TextureSlot::Specular),
        ],
    }
}

fn shading_model(options: &ImportOptions) -> ShadingModel {
    match options.forced_shading_model {
        Some(model) => model,
        // Spec-gloss is the historical default for OBJ assets only.
        None if options.source_format == SourceFormat::Obj => ShadingModel::SpecGloss,
        None => ShadingModel::MetalRough,
    }
}

/// Convert all materials, in source order. Returns the minted IDs indexed by
/// source material position.
pub fn create_materials<B: SceneBuilder>(
    scene: &SourceScene,
    builder: &mut B,
    options: &ImportOptions,
) -> Vec<MaterialId> {
    scene
        .materials
        .iter()
        .map(|material| create_material(material, builder, options))
        .collect()
}

fn create_material<B: SceneBuilder>(
    material: &SourceMaterial,
    builder: &mut B,
    options: &ImportOptions,
) -> MaterialId {
    let mut name = material.name.clone();
    if name.is_empty() {
        warn!("material with no name found, renaming to 'unnamed'");
        name = "unnamed".to_owned();
    }

    let mut double_sided = material.double_sided;

    // Tokens after a '.' in the name are special flags.
    let mut tokens = name.split('.');
    let base_name = tokens.next().unwrap_or_default().to_owned();
    for token in tokens {
        if token.eq_ignore_ascii_case("doublesided") {
            double_sided = true;
        } else {
            warn!("material '{name}' has an unknown material property: '{token}'");
        }
    }

    let id = builder.add_material(MaterialDesc {
        name: base_name,
        shading_model: shading_model(options),
        double_sided,
    });

    load_textures(material, id, builder, options);

    id
}

fn load_textures<B: SceneBuilder>(
    material: &SourceMaterial,
    id: MaterialId,
    builder: &mut B,
    options: &ImportOptions,
) {
    let search_path = options.path.parent().unwrap_or(Path::new(""));

    for &(kind, slot) in texture_mappings(options.source_format) {
        let Some(texture) = material.textures.iter().find(|t| t.kind == kind) else {
            continue;
        };
        if texture.path.is_empty() {
            warn!("material '{}': texture has empty file name, ignoring", material.name);
            continue;
        }
        // Assets may carry Windows-native paths.
        let relative = texture.path.replace('\\', "/");
        builder.load_material_texture(id, slot, &search_path.join(relative));
    }
}
