//! Built-in geometry

use super::mesh::Vertex;

/// Number of vertices in [`cube_vertices`]
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Unit cube centred on the origin as a non-indexed triangle list
///
/// Six faces, two triangles each, counter-clockwise when viewed from outside.
/// Used for point light markers.
pub fn cube_vertices() -> Vec<Vertex> {
    // (normal, four corners counter-clockwise from outside)
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, -1.0], [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]]),
        ([0.0, 0.0, 1.0], [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]]),
        ([-1.0, 0.0, 0.0], [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]]),
        ([1.0, 0.0, 0.0], [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]]),
        ([0.0, -1.0, 0.0], [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]]),
        ([0.0, 1.0, 0.0], [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]]),
    ];
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for (normal, corners) in FACES {
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::new(corners[i], normal, UVS[i]));
        }
    }
    vertices
}

/// Number of vertices in [`quad_vertices`]
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Unit quad in the XY plane facing +Z, as two triangles
///
/// Used for the blended window panes; scale it through the model matrix.
pub fn quad_vertices() -> Vec<Vertex> {
    const CORNERS: [([f32; 3], [f32; 2]); 4] = [
        ([-0.5, -0.5, 0.0], [0.0, 0.0]),
        ([0.5, -0.5, 0.0], [1.0, 0.0]),
        ([0.5, 0.5, 0.0], [1.0, 1.0]),
        ([-0.5, 0.5, 0.0], [0.0, 1.0]),
    ];
    [0, 1, 2, 0, 2, 3]
        .into_iter()
        .map(|i| Vertex::new(CORNERS[i].0, [0.0, 0.0, 1.0], CORNERS[i].1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_cube_has_36_vertices_within_unit_bounds() {
        let cube = cube_vertices();
        assert_eq!(cube.len(), CUBE_VERTEX_COUNT as usize);
        assert!(cube.iter().all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let cube = cube_vertices();
        for tri in cube.chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let face_normal = (b - a).cross(&(c - a));
            assert!(face_normal.dot(&Vec3::from(tri[0].normal)) > 0.0);
        }
    }

    #[test]
    fn test_quad_is_two_front_facing_triangles() {
        let quad = quad_vertices();
        assert_eq!(quad.len(), QUAD_VERTEX_COUNT as usize);
        assert!(quad.iter().all(|v| v.position[2] == 0.0 && v.position[0].abs() == 0.5));
        for tri in quad.chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }
}
