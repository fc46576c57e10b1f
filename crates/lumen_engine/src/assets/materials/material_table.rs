//! Material table: uploaded materials of one model
//!
//! Built from one or more MTL libraries. Diffuse maps are resolved against the
//! model's directory, decoded and uploaded once per distinct path. A path that
//! fails to decode is remembered too and not retried. The table owns the
//! uploaded textures; the [`Material`]s it hands out only copy the handles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::mtl_parser::{MtlLibrary, MtlParser};
use crate::assets::{AssetError, ImageData, LoadOptions, ParseDiagnostic};
use crate::render::{GraphicsBackend, Material, RenderError, TextureHandle};

/// Index of the first material called `name`
///
/// Scans in declaration order, so the first of several same-named materials
/// wins. `None` means no material has that name.
pub fn get_material_index(name: &str, materials: &[Material]) -> Option<usize> {
    materials.iter().position(|m| m.name == name)
}

/// Ordered, uploaded materials
#[derive(Debug, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    textures: HashMap<PathBuf, Option<TextureHandle>>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl MaterialTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one MTL file
    ///
    /// `base_dir` is the directory of the model that referenced the library;
    /// `map_Kd` paths are relative to it.
    pub fn load(
        path: impl AsRef<Path>,
        base_dir: impl AsRef<Path>,
        backend: &mut dyn GraphicsBackend,
        options: &LoadOptions,
    ) -> Result<Self, AssetError> {
        let mut table = Self::new();
        table.load_library(path, base_dir, backend, options)?;
        Ok(table)
    }

    /// Load one MTL file and append its materials
    pub fn load_library(
        &mut self,
        path: impl AsRef<Path>,
        base_dir: impl AsRef<Path>,
        backend: &mut dyn GraphicsBackend,
        options: &LoadOptions,
    ) -> Result<(), AssetError> {
        let path = path.as_ref();
        log::debug!("Loading material library {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|e| AssetError::open(path, e))?;

        let library = MtlParser::parse(&contents);
        for diagnostic in &library.diagnostics {
            log::warn!("{}: skipped {}", path.display(), diagnostic);
        }
        self.add_library(library, base_dir.as_ref(), backend, options)?;
        Ok(())
    }

    /// Append parsed materials, uploading their diffuse maps
    ///
    /// A texture that cannot be decoded is logged and the material is kept
    /// untextured. Backend failures are errors.
    pub fn add_library(
        &mut self,
        library: MtlLibrary,
        base_dir: &Path,
        backend: &mut dyn GraphicsBackend,
        options: &LoadOptions,
    ) -> Result<(), RenderError> {
        self.diagnostics.extend(library.diagnostics);

        for data in library.materials {
            let mut material = Material::new(data.name, data.ambient, data.diffuse, data.specular, data.shininess);
            if let Some(map) = &data.diffuse_map {
                material.texture = self.texture(&base_dir.join(map), backend, options)?;
            }
            log::debug!(
                "Material '{}': diffuse ({:.2}, {:.2}, {:.2}), textured: {}",
                material.name,
                material.diffuse.x,
                material.diffuse.y,
                material.diffuse.z,
                material.texture.is_some()
            );
            self.materials.push(material);
        }
        Ok(())
    }

    fn texture(
        &mut self,
        path: &Path,
        backend: &mut dyn GraphicsBackend,
        options: &LoadOptions,
    ) -> Result<Option<TextureHandle>, RenderError> {
        if let Some(cached) = self.textures.get(path) {
            return Ok(*cached);
        }

        let handle = match ImageData::from_file(path, options.flip_textures_vertically) {
            Ok(image) => Some(backend.upload_texture(&image, &options.texture_params)?),
            Err(e) => {
                log::warn!("Texture skipped: {}", e);
                None
            }
        };
        self.textures.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    /// Append an already built material
    pub fn push(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// Materials in declaration order
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// First material called `name`
    pub fn get(&self, name: &str) -> Option<&Material> {
        get_material_index(name, &self.materials).map(|i| &self.materials[i])
    }

    /// Material for a face's `usemtl` name, falling back to [`Material::fallback`]
    pub fn resolve(&self, name: Option<&str>) -> Material {
        match name.and_then(|n| self.get(n)) {
            Some(material) => material.clone(),
            None => {
                if let Some(name) = name {
                    log::warn!("Unknown material '{}', using fallback", name);
                }
                Material::fallback()
            }
        }
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the table has no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Number of distinct uploaded textures
    pub fn texture_count(&self) -> usize {
        self.textures.values().flatten().count()
    }

    /// Lines skipped while parsing the libraries
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// Free every uploaded texture
    ///
    /// Keeps going after a failed release and returns the first error.
    pub fn release(self, backend: &mut dyn GraphicsBackend) -> Result<(), RenderError> {
        let mut first_error = None;
        for (path, handle) in self.textures {
            let Some(handle) = handle else { continue };
            if let Err(e) = backend.release_texture(handle) {
                log::error!("Failed to release texture {:?}: {}", path, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::HeadlessBackend;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen_mtl_{}_{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path) {
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255])).save(path).unwrap();
    }

    fn named(name: &str) -> Material {
        Material::new(name, Vec3::zeros(), Vec3::zeros(), Vec3::zeros(), 1.0)
    }

    #[test]
    fn test_first_declared_wins() {
        let mut materials = vec![named("a"), named("dup"), named("b"), named("dup")];
        materials[3].shininess = 99.0;

        assert_eq!(get_material_index("dup", &materials), Some(1));
        assert_eq!(get_material_index("b", &materials), Some(2));
        assert_eq!(get_material_index("missing", &materials), None);
        assert_eq!(get_material_index("", &[]), None);
    }

    #[test]
    fn test_textures_uploaded_once_per_path() {
        let dir = fixture_dir("shared");
        write_png(&dir.join("green.png"));
        std::fs::write(
            dir.join("scene.mtl"),
            "newmtl a\nmap_Kd green.png\nnewmtl b\nmap_Kd green.png\nnewmtl c\nKd 1 0 0\n",
        )
        .unwrap();

        let mut backend = HeadlessBackend::new();
        let table = MaterialTable::load(dir.join("scene.mtl"), &dir, &mut backend, &LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.texture_count(), 1);
        assert_eq!(backend.texture_count(), 1);
        assert_eq!(table.materials()[0].texture, table.materials()[1].texture);
        assert!(table.materials()[2].texture.is_none());

        table.release(&mut backend).unwrap();
        assert_eq!(backend.texture_count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_undecodable_texture_keeps_material() {
        let dir = fixture_dir("broken");
        std::fs::write(dir.join("broken.png"), b"definitely not a png").unwrap();
        std::fs::write(dir.join("scene.mtl"), "newmtl a\nKd 0 0 1\nmap_Kd broken.png\nnewmtl b\nmap_Kd missing.png\n").unwrap();

        let mut backend = HeadlessBackend::new();
        let table = MaterialTable::load(dir.join("scene.mtl"), &dir, &mut backend, &LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 2);
        let a = table.get("a").unwrap();
        assert!(a.texture.is_none());
        assert_eq!(a.diffuse, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(backend.texture_count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_undecodable_texture_is_read_once() {
        let dir = fixture_dir("broken_shared");
        std::fs::write(dir.join("broken.png"), b"not an image either").unwrap();
        std::fs::write(dir.join("scene.mtl"), "newmtl a\nmap_Kd broken.png\nnewmtl b\nmap_Kd broken.png\n").unwrap();

        let mut backend = HeadlessBackend::new();
        let mut table = MaterialTable::load(dir.join("scene.mtl"), &dir, &mut backend, &LoadOptions::default()).unwrap();
        assert_eq!(table.textures.len(), 1);
        assert_eq!(table.texture_count(), 0);

        // a later fix to the file on disk is not picked up by this table
        write_png(&dir.join("broken.png"));
        table
            .load_library(dir.join("scene.mtl"), &dir, &mut backend, &LoadOptions::default())
            .unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.materials().iter().all(|m| m.texture.is_none()));
        assert_eq!(backend.texture_count(), 0);

        table.release(&mut backend).unwrap();
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_release_continues_past_failed_texture() {
        let dir = fixture_dir("release_all");
        write_png(&dir.join("one.png"));
        write_png(&dir.join("two.png"));
        std::fs::write(dir.join("scene.mtl"), "newmtl a\nmap_Kd one.png\nnewmtl b\nmap_Kd two.png\n").unwrap();

        let mut backend = HeadlessBackend::new();
        let table = MaterialTable::load(dir.join("scene.mtl"), &dir, &mut backend, &LoadOptions::default()).unwrap();
        assert_eq!(backend.texture_count(), 2);
        let freed = table.materials()[0].texture.unwrap();
        backend.release_texture(freed).unwrap();

        let result = table.release(&mut backend);
        assert!(matches!(result, Err(RenderError::UnknownHandle("texture"))));
        assert_eq!(backend.texture_count(), 0);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_library_is_fatal() {
        let mut backend = HeadlessBackend::new();
        let result = MaterialTable::load("/nonexistent/lumen/scene.mtl", "/nonexistent", &mut backend, &LoadOptions::default());
        assert!(matches!(result, Err(AssetError::Open { .. })));
    }

    #[test]
    fn test_resolve_falls_back() {
        let mut table = MaterialTable::new();
        table.push(named("red"));

        assert_eq!(table.resolve(Some("red")).name, "red");
        assert!(table.resolve(Some("blue")).is_fallback());
        assert!(table.resolve(None).is_fallback());
    }
}
