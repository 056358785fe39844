//! Import options
//!
//! Caller-supplied switches plus the source format family, which selects the
//! format-specific quirks: animation time-base override, texture slot
//! mapping table, default shading model and camera conventions.

use std::path::{Path, PathBuf};

use glam::Mat4;

use crate::builder::ShadingModel;

/// Source format family. Selected from the asset's file extension; it only
/// controls quirk handling, never parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Default,
    Obj,
    Gltf2,
}

impl SourceFormat {
    /// Classify an asset path by extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("obj") => Self::Obj,
            Some("gltf") | Some("glb") => Self::Gltf2,
            _ => Self::Default,
        }
    }
}

/// Options controlling one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Path of the asset being imported. Used for error context and as the
    /// search directory for material textures; the core performs no file I/O
    /// on it.
    pub path: PathBuf,
    pub source_format: SourceFormat,
    /// Keep the source's tangents and bitangents instead of leaving tangent
    /// generation to the renderer.
    pub use_original_tangent_space: bool,
    /// Force a shading model for all materials. `None` applies the
    /// per-format default (spec-gloss for OBJ, metal-rough otherwise).
    pub forced_shading_model: Option<ShadingModel>,
    /// Explicit instance transforms. Empty means a single instance bound
    /// directly to each mesh's node.
    pub instances: Vec<Mat4>,
}

impl ImportOptions {
    /// Options for `path` with the format family derived from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source_format = SourceFormat::from_path(&path);
        Self {
            path,
            source_format,
            ..Self::default()
        }
    }
}
