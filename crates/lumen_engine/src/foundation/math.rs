//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of matrix helpers the
//! loaders and light collections need.

pub use nalgebra::{
    Vector2, Vector3,
    Matrix4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a translation matrix
    fn translation(offset: Vec3) -> Mat4;

    /// Create a translation followed by a uniform scale (scale applied first to vertices)
    fn translation_scale(offset: Vec3, scale: f32) -> Mat4;

    /// Create a right-handed OpenGL-style perspective projection (`fov_y` in degrees)
    fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: Vec3) -> Mat4 {
        Mat4::new_translation(&offset)
    }

    fn translation_scale(offset: Vec3, scale: f32) -> Mat4 {
        Mat4::new_translation(&offset) * Mat4::new_scaling(scale)
    }

    fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y_degrees * constants::DEG_TO_RAD, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

/// Transform a point by a homogeneous matrix (w = 1)
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(point)).coords
}
