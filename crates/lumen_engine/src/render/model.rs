//! Loaded model: a set of per-material meshes at a world position

use std::path::{Path, PathBuf};

use super::backend::{BackendResult, GraphicsBackend};
use super::mesh::Mesh;
use super::shader::ShaderProgram;
use crate::assets::{MaterialTable, ParseDiagnostic};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Drawable model
///
/// Meshes are drawn in construction order, which is the order their
/// materials were first referenced in the source file. Geometry is fixed
/// after load; only [`Model::position`] changes between draws. The model
/// owns its meshes and the material table holding their textures.
#[derive(Debug)]
pub struct Model {
    /// World-space translation applied at draw time
    pub position: Vec3,
    meshes: Vec<Mesh>,
    materials: MaterialTable,
    diagnostics: Vec<ParseDiagnostic>,
    source: PathBuf,
}

impl Model {
    /// Assemble a model from uploaded meshes
    pub fn new(
        source: impl Into<PathBuf>,
        meshes: Vec<Mesh>,
        materials: MaterialTable,
        diagnostics: Vec<ParseDiagnostic>,
    ) -> Self {
        Self {
            position: Vec3::zeros(),
            meshes,
            materials,
            diagnostics,
            source: source.into(),
        }
    }

    /// Set the world position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Draw every mesh with its material
    pub fn draw(&self, shader: &mut dyn ShaderProgram) {
        let model_matrix = self.model_matrix();
        for mesh in &self.meshes {
            mesh.material().apply(shader);
            shader.set_mat4("model", &model_matrix);
            shader.draw_indexed(mesh.handle(), mesh.index_count());
        }
    }

    /// Translation matrix for the current position
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::translation(self.position)
    }

    /// Per-material meshes in draw order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Material table the meshes were resolved against
    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    /// Total triangles over all meshes
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangle_count() as usize).sum()
    }

    /// Lines skipped while parsing the model and its material libraries
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    /// File the model was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Free mesh buffers and material textures
    ///
    /// Every resource is released even if one fails; the first error is
    /// returned.
    pub fn release(self, backend: &mut dyn GraphicsBackend) -> BackendResult<()> {
        let mut first_error = None;
        for mesh in self.meshes {
            if let Err(e) = mesh.release(backend) {
                log::error!("Failed to release mesh of {:?}: {}", self.source, e);
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.materials.release(backend) {
            first_error.get_or_insert(e);
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::{ProgramCommand, RecordingProgram};
    use crate::render::{HeadlessBackend, Material, MeshData, Vertex};

    fn quad_mesh(backend: &mut HeadlessBackend, material: Material) -> Mesh {
        let data = MeshData::new(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2, 0, 2, 3],
        );
        Mesh::upload(backend, &data, material).unwrap()
    }

    fn pushed_translation(shader: &RecordingProgram) -> Vec3 {
        let m = shader.mat4("model").unwrap();
        Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    #[test]
    fn test_draw_issues_one_draw_per_mesh_in_order() {
        let mut backend = HeadlessBackend::new();
        let first = quad_mesh(&mut backend, Material::fallback());
        let second = quad_mesh(&mut backend, Material::fallback());
        let handles = [first.handle(), second.handle()];
        let model = Model::new("quads.obj", vec![first, second], MaterialTable::new(), Vec::new()).with_position(Vec3::new(0.0, -3.5, 0.0));

        let mut shader = RecordingProgram::new("phong");
        model.draw(&mut shader);

        let draws: Vec<_> = shader
            .commands()
            .iter()
            .filter_map(|c| match c {
                ProgramCommand::DrawIndexed { mesh, index_count } => Some((*mesh, *index_count)),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![(handles[0], 6), (handles[1], 6)]);
        assert_eq!(model.triangle_count(), 4);

        assert_eq!(pushed_translation(&shader), Vec3::new(0.0, -3.5, 0.0));
    }

    #[test]
    fn test_moving_position_changes_next_draw() {
        let mut backend = HeadlessBackend::new();
        let mesh = quad_mesh(&mut backend, Material::fallback());
        let mut model = Model::new("quad.obj", vec![mesh], MaterialTable::new(), Vec::new());

        let mut shader = RecordingProgram::new("phong");
        model.draw(&mut shader);
        model.position = Vec3::new(2.0, 0.0, 0.0);
        model.draw(&mut shader);

        assert_eq!(pushed_translation(&shader), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(shader.draw_count(), 2);
    }

    #[test]
    fn test_release_frees_meshes() {
        let mut backend = HeadlessBackend::new();
        let mesh = quad_mesh(&mut backend, Material::fallback());
        let model = Model::new("quad.obj", vec![mesh], MaterialTable::new(), Vec::new());
        assert_eq!(backend.mesh_count(), 1);

        model.release(&mut backend).unwrap();
        assert_eq!(backend.mesh_count(), 0);
    }

    #[test]
    fn test_release_continues_past_failed_mesh() {
        let mut backend = HeadlessBackend::new();
        let first = quad_mesh(&mut backend, Material::fallback());
        let second = quad_mesh(&mut backend, Material::fallback());
        let third = quad_mesh(&mut backend, Material::fallback());
        backend.release_mesh(first.handle()).unwrap();
        let model = Model::new("quads.obj", vec![first, second, third], MaterialTable::new(), Vec::new());

        let result = model.release(&mut backend);
        assert!(matches!(result, Err(crate::render::RenderError::UnknownHandle("mesh"))));
        assert_eq!(backend.mesh_count(), 0);
    }
}
