//! Shader program interface
//!
//! A [`ShaderProgram`] is the program currently in use: named uniform slots
//! plus the draw submissions issued while it is bound. Uniform names follow
//! GLSL conventions, including struct arrays (`pointLights[2].diffuse`).
//!
//! [`RecordingProgram`] keeps the last value written to every uniform and an
//! ordered command log. The frame driver replays the log against the real
//! graphics API, tests inspect it directly.

use std::collections::HashMap;

use super::backend::{MeshHandle, TextureHandle, VertexArrayHandle};
use crate::foundation::math::{Mat4, Vec3};

/// Value stored in a uniform slot
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// `int` / `bool` / `sampler2D` unit
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec3`
    Vec3(Vec3),
    /// `mat4`
    Mat4(Mat4),
}

/// One recorded program operation
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramCommand {
    /// Uniform write
    SetUniform {
        /// Uniform name
        name: String,
        /// Written value
        value: UniformValue,
    },
    /// Texture bound to a texture unit (`None` unbinds)
    BindTexture {
        /// Texture unit
        unit: u32,
        /// Bound texture
        texture: Option<TextureHandle>,
    },
    /// Indexed triangle draw
    DrawIndexed {
        /// Mesh buffers
        mesh: MeshHandle,
        /// Number of indices
        index_count: u32,
    },
    /// Non-indexed triangle draw
    DrawArrays {
        /// Vertex array
        vertex_array: VertexArrayHandle,
        /// Number of vertices
        vertex_count: u32,
    },
}

/// Active shader program
pub trait ShaderProgram {
    /// Program name for diagnostics
    fn name(&self) -> &str;

    /// Write an `int` uniform
    fn set_int(&mut self, name: &str, value: i32);

    /// Write a `float` uniform
    fn set_float(&mut self, name: &str, value: f32);

    /// Write a `vec3` uniform
    fn set_vec3(&mut self, name: &str, value: &Vec3);

    /// Write a `mat4` uniform
    fn set_mat4(&mut self, name: &str, value: &Mat4);

    /// Bind a texture to a texture unit, `None` unbinds it
    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>);

    /// Issue an indexed triangle draw
    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32);

    /// Issue a non-indexed triangle draw
    fn draw_arrays(&mut self, vertex_array: VertexArrayHandle, vertex_count: u32);

    /// Write a `bool` uniform (GLSL bools are set as ints)
    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, i32::from(value));
    }
}

/// Program that records uniform state and commands in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingProgram {
    name: String,
    uniforms: HashMap<String, UniformValue>,
    commands: Vec<ProgramCommand>,
}

impl RecordingProgram {
    /// Create a program with no uniforms set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Last value written to a uniform
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Last `int` written to a uniform
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.uniforms.get(name)? {
            UniformValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Last `float` written to a uniform
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Last `vec3` written to a uniform
    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.uniforms.get(name)? {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Last `mat4` written to a uniform
    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.uniforms.get(name)? {
            UniformValue::Mat4(v) => Some(*v),
            _ => None,
        }
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[ProgramCommand] {
        &self.commands
    }

    /// Number of draw commands recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, ProgramCommand::DrawIndexed { .. } | ProgramCommand::DrawArrays { .. }))
            .count()
    }

    /// Names of recorded uniform writes starting with `prefix`, in write order
    pub fn writes_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.commands.iter().filter_map(move |c| match c {
            ProgramCommand::SetUniform { name, .. } if name.starts_with(prefix) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Drop the command log, keeping uniform state (as a linked program does between frames)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn record_uniform(&mut self, name: &str, value: UniformValue) {
        log::trace!("{}: {} = {:?}", self.name, name, value);
        self.uniforms.insert(name.to_string(), value.clone());
        self.commands.push(ProgramCommand::SetUniform {
            name: name.to_string(),
            value,
        });
    }
}

impl ShaderProgram for RecordingProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record_uniform(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: &Vec3) {
        self.record_uniform(name, UniformValue::Vec3(*value));
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        self.record_uniform(name, UniformValue::Mat4(*value));
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        self.commands.push(ProgramCommand::BindTexture { unit, texture });
    }

    fn draw_indexed(&mut self, mesh: MeshHandle, index_count: u32) {
        self.commands.push(ProgramCommand::DrawIndexed { mesh, index_count });
    }

    fn draw_arrays(&mut self, vertex_array: VertexArrayHandle, vertex_count: u32) {
        self.commands.push(ProgramCommand::DrawArrays { vertex_array, vertex_count });
    }
}
