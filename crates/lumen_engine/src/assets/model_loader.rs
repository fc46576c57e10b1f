//! Model loading: OBJ faces to per-material GPU meshes
//!
//! Faces are grouped by their `usemtl` name in the order each name first
//! appears, fan-triangulated, and deduplicated per group so that identical
//! (position, tex coord, normal) corners share one vertex. Each group becomes
//! one [`Mesh`] bound to the material of that name.

use std::collections::HashMap;
use std::path::Path;

use crate::assets::{AssetError, LoadOptions, MaterialTable, ObjData, ObjParser};
use crate::assets::obj_parser::{Face, FaceVertex};
use crate::render::{GraphicsBackend, Mesh, MeshData, Model, Vertex};

/// Triangles of one material, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGroup {
    /// `usemtl` name shared by the group's faces
    pub material: Option<String>,
    /// Deduplicated vertices and triangle indices
    pub data: MeshData,
}

#[derive(Default)]
struct GroupBuilder {
    data: MeshData,
    lookup: HashMap<FaceVertex, u32>,
}

impl GroupBuilder {
    /// Resolve a corner's attributes, `None` if any index is out of range
    fn resolve(corner: &FaceVertex, obj: &ObjData) -> Option<Vertex> {
        let position = *obj.positions.get(corner.position)?;
        let tex_coord = match corner.tex_coord {
            Some(i) => *obj.tex_coords.get(i)?,
            None => [0.0, 0.0],
        };
        let normal = match corner.normal {
            Some(i) => *obj.normals.get(i)?,
            None => [0.0, 0.0, 0.0],
        };
        Some(Vertex::new(position, normal, tex_coord))
    }

    fn push_corner(&mut self, corner: FaceVertex, vertex: Vertex) {
        let index = match self.lookup.get(&corner) {
            Some(&index) => index,
            None => {
                let index = self.data.vertices.len() as u32;
                self.data.vertices.push(vertex);
                self.lookup.insert(corner, index);
                index
            }
        };
        self.data.indices.push(index);
    }

    fn push_face(&mut self, face: &Face, obj: &ObjData) {
        for triangle in face.triangulate() {
            let vertices = [
                Self::resolve(&triangle[0], obj),
                Self::resolve(&triangle[1], obj),
                Self::resolve(&triangle[2], obj),
            ];
            let [Some(a), Some(b), Some(c)] = vertices else {
                log::warn!("Skipping triangle with out-of-range index: {:?}", triangle);
                continue;
            };
            for (corner, vertex) in triangle.into_iter().zip([a, b, c]) {
                self.push_corner(corner, vertex);
            }
        }
    }
}

fn build_groups<'a>(obj: &'a ObjData, key: impl Fn(&'a Face) -> Option<&'a str>) -> Vec<MeshGroup> {
    let mut order: Vec<Option<&str>> = Vec::new();
    let mut builders: HashMap<Option<&str>, GroupBuilder> = HashMap::new();

    for face in &obj.faces {
        let name = key(face);
        let builder = builders.entry(name).or_insert_with(|| {
            order.push(name);
            GroupBuilder::default()
        });
        builder.push_face(face, obj);
    }

    order
        .into_iter()
        .filter_map(|name| {
            let builder = builders.remove(&name)?;
            Some(MeshGroup {
                material: name.map(str::to_string),
                data: builder.data,
            })
        })
        .collect()
}

/// Group faces by material and build deduplicated triangle lists
///
/// Groups are returned in the order their material name first appears. Faces
/// without a `usemtl` form their own group with `material: None`.
pub fn build_mesh_groups(obj: &ObjData) -> Vec<MeshGroup> {
    build_groups(obj, |face| face.material.as_deref())
}

/// OBJ model loader
pub struct ModelLoader;

impl ModelLoader {
    /// Load a model and its materials, uploading one mesh per material
    ///
    /// Fails if the model or any `mtllib` it names cannot be read; nothing
    /// stays allocated on the backend in that case. Malformed lines, unknown
    /// materials and undecodable textures only produce warnings.
    pub fn load(
        path: impl AsRef<Path>,
        backend: &mut dyn GraphicsBackend,
        options: &LoadOptions,
    ) -> Result<Model, AssetError> {
        let path = path.as_ref();
        log::debug!("Loading model {:?}", path);
        let obj = ObjParser::parse_file(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let mut materials = MaterialTable::new();
        for library in &obj.material_libraries {
            if let Err(e) = materials.load_library(base_dir.join(library), base_dir, backend, options) {
                if let Err(release_error) = materials.release(backend) {
                    log::error!("Failed to free textures of {:?}: {}", path, release_error);
                }
                return Err(e);
            }
        }

        let groups = build_mesh_groups(&obj);
        let mut meshes = Vec::with_capacity(groups.len());
        for group in groups {
            if group.data.is_empty() {
                continue;
            }
            let material = materials.resolve(group.material.as_deref());
            match Mesh::upload(backend, &group.data, material) {
                Ok(mesh) => meshes.push(mesh),
                Err(e) => {
                    let partial = Model::new(path, meshes, materials, Vec::new());
                    if let Err(release_error) = partial.release(backend) {
                        log::error!("Failed to free partial model {:?}: {}", path, release_error);
                    }
                    return Err(e.into());
                }
            }
        }

        let mut diagnostics = obj.diagnostics;
        diagnostics.extend_from_slice(materials.diagnostics());

        let model = Model::new(path, meshes, materials, diagnostics);
        log::info!(
            "Loaded model {:?}: {} meshes, {} triangles, {} materials, {} diagnostics",
            path,
            model.meshes().len(),
            model.triangle_count(),
            model.materials().len(),
            model.diagnostics().len()
        );
        Ok(model)
    }

    /// Load geometry only, every face in one triangle list
    ///
    /// Material statements are ignored and nothing is uploaded.
    pub fn load_single_mesh(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
        let obj = ObjParser::parse_file(path)?;
        Ok(build_groups(&obj, |_| None)
            .into_iter()
            .next()
            .map(|group| group.data)
            .unwrap_or_default())
    }
}
