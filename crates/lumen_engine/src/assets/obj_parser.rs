//! Wavefront OBJ parser
//!
//! Reads the geometry subset used by the demo assets: `v`, `vt`, `vn`, `f`,
//! `usemtl` and `mtllib`. Anything else (`o`, `g`, `s`, `l`, ...) is ignored.
//!
//! Face indices are converted to 0-based and checked against the arrays
//! declared *before* the face, so every index stored in [`ObjData`] is in
//! range. Faces that fail this check are dropped with a diagnostic.

use std::path::Path;

use crate::assets::{material_name, AssetError, ParseDiagnostic};

/// One corner of a face: indices into the position, tex coord and normal arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    /// Position index
    pub position: usize,
    /// Texture coordinate index
    pub tex_coord: Option<usize>,
    /// Normal index
    pub normal: Option<usize>,
}

impl FaceVertex {
    /// Create a face vertex
    pub const fn new(position: usize, tex_coord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

/// Polygon with the material that was active when it was declared
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Corners in file order, at least three
    pub vertices: Vec<FaceVertex>,
    /// Active `usemtl` name, `None` before the first one
    pub material: Option<String>,
}

impl Face {
    /// Fan-triangulate around the first corner
    ///
    /// An n-gon yields n - 2 triangles `(v0, v1, v2), (v0, v2, v3), ...`; a
    /// triangle yields itself. Assumes a convex polygon.
    pub fn triangulate(&self) -> Vec<[FaceVertex; 3]> {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return Vec::new();
        };
        rest.windows(2).map(|pair| [first, pair[0], pair[1]]).collect()
    }

    /// Number of triangles [`Face::triangulate`] produces
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }
}

/// Parsed OBJ contents
#[derive(Debug, Clone, Default)]
pub struct ObjData {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates
    pub tex_coords: Vec<[f32; 2]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Faces in file order
    pub faces: Vec<Face>,
    /// `mtllib` paths in file order, relative to the OBJ file
    pub material_libraries: Vec<String>,
    /// Skipped lines
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ObjData {
    /// Triangles after fan triangulation of every face
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(Face::triangle_count).sum()
    }
}

/// OBJ parser
pub struct ObjParser;

impl ObjParser {
    /// Read and parse an OBJ file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<ObjData, AssetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| AssetError::open(path, e))?;
        let data = Self::parse(&contents);
        for diagnostic in &data.diagnostics {
            log::warn!("{}: skipped {}", path.display(), diagnostic);
        }
        Ok(data)
    }

    /// Parse OBJ text
    pub fn parse(contents: &str) -> ObjData {
        let mut data = ObjData::default();
        let mut current_material: Option<String> = None;

        for (line_index, line) in contents.lines().enumerate() {
            let line_num = line_index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim();
            let result = match command {
                "v" => parse_floats::<3>(rest, "v").map(|p| data.positions.push(p)),
                "vt" => parse_floats::<2>(rest, "vt").map(|t| data.tex_coords.push(t)),
                "vn" => parse_floats::<3>(rest, "vn").map(|n| data.normals.push(n)),
                "f" => Self::parse_face(rest, &data).map(|vertices| {
                    data.faces.push(Face {
                        vertices,
                        material: current_material.clone(),
                    });
                }),
                "usemtl" if !rest.is_empty() => {
                    current_material = Some(material_name(rest));
                    Ok(())
                }
                "mtllib" if !rest.is_empty() => {
                    data.material_libraries.push(rest.to_string());
                    Ok(())
                }
                "usemtl" | "mtllib" => Err(format!("{command} missing name")),
                _ => Ok(()),
            };

            if let Err(message) = result {
                data.diagnostics.push(ParseDiagnostic::new(line_num, message));
            }
        }

        log::debug!(
            "Parsed OBJ: {} positions, {} tex coords, {} normals, {} faces",
            data.positions.len(),
            data.tex_coords.len(),
            data.normals.len(),
            data.faces.len()
        );
        data
    }

    fn parse_face(rest: &str, data: &ObjData) -> Result<Vec<FaceVertex>, String> {
        let vertices = rest
            .split_whitespace()
            .map(|token| Self::parse_face_vertex(token, data))
            .collect::<Result<Vec<_>, _>>()?;
        if vertices.len() < 3 {
            return Err(format!("face has {} vertices, need at least 3", vertices.len()));
        }
        Ok(vertices)
    }

    /// `p`, `p/t`, `p//n` or `p/t/n`
    fn parse_face_vertex(token: &str, data: &ObjData) -> Result<FaceVertex, String> {
        let mut parts = token.split('/');
        let position = match parts.next() {
            Some(p) if !p.is_empty() => resolve_index(p, data.positions.len(), "position")?,
            _ => return Err(format!("face vertex '{token}' has no position index")),
        };
        let tex_coord = match parts.next() {
            Some(t) if !t.is_empty() => Some(resolve_index(t, data.tex_coords.len(), "tex coord")?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(n) if !n.is_empty() => Some(resolve_index(n, data.normals.len(), "normal")?),
            _ => None,
        };
        if parts.next().is_some() {
            return Err(format!("face vertex '{token}' has too many components"));
        }
        Ok(FaceVertex::new(position, tex_coord, normal))
    }
}

/// Convert a 1-based (or negative, relative) OBJ index to 0-based
fn resolve_index(token: &str, count: usize, kind: &str) -> Result<usize, String> {
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("invalid {kind} index '{token}'"))?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(count as i64 + r).ok(),
    };
    resolved
        .filter(|&i| i < count)
        .ok_or_else(|| format!("{kind} index {raw} out of range ({count} declared)"))
}

/// Leading `N` floats; extra components (such as `w`) are ignored
fn parse_floats<const N: usize>(rest: &str, command: &str) -> Result<[f32; N], String> {
    let mut out = [0.0; N];
    let mut tokens = rest.split_whitespace();
    for slot in &mut out {
        let token = tokens
            .next()
            .ok_or_else(|| format!("{command} needs {N} values"))?;
        *slot = token
            .parse()
            .map_err(|_| format!("{command} invalid float value '{token}'"))?;
    }
    Ok(out)
}
