//! Asset loading
//!
//! Wavefront OBJ geometry, MTL material libraries and the images they
//! reference. Parsing is lenient: a malformed line is skipped and reported as
//! a [`ParseDiagnostic`] instead of failing the whole file. Only files that
//! cannot be opened at all are errors.

pub mod image_loader;
pub mod materials;
pub mod obj_parser;
pub mod model_loader;

pub use image_loader::ImageData;
pub use materials::{get_material_index, MaterialTable, MtlData, MtlLibrary, MtlParser};
pub use obj_parser::{Face, FaceVertex, ObjData, ObjParser};
pub use model_loader::{build_mesh_groups, MeshGroup, ModelLoader};

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::render::{RenderError, TextureParams};

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be opened or read
    #[error("Failed to open {path:?}: {source}")]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Image could not be decoded
    #[error("Failed to decode image {path:?}: {source}")]
    Image {
        /// Image path
        path: PathBuf,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// GPU upload failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl AssetError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}

/// Material name as written after `newmtl` / `usemtl`
///
/// Runs of whitespace collapse to a single space so both statements compare
/// equal however the exporter padded them.
pub(crate) fn material_name(rest: &str) -> String {
    rest.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Options shared by model and texture loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Flip decoded images so row 0 is the bottom row
    pub flip_textures_vertically: bool,
    /// Sampling parameters for material textures
    pub texture_params: TextureParams,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            flip_textures_vertically: true,
            texture_params: TextureParams::default(),
        }
    }
}

/// A skipped or suspicious line in a parsed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// 1-based line number
    pub line: usize,
    /// What was wrong with it
    pub message: String,
}

impl ParseDiagnostic {
    /// Create a diagnostic
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
