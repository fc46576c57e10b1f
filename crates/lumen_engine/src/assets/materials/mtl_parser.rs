//! MTL (Material Template Library) file parser
//!
//! Parses the Phong subset of Wavefront .mtl files: `newmtl`, `Ka`, `Kd`,
//! `Ks`, `Ns` and `map_Kd`. Materials are kept in declaration order, which
//! decides lookups when a name is declared twice.

use crate::assets::{material_name, ParseDiagnostic};
use crate::foundation::math::Vec3;

/// Parsed MTL material
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub shininess: f32,
    /// Diffuse texture map (map_Kd), as written in the file
    pub diffuse_map: Option<String>,
}

impl MtlData {
    /// Material with default coefficients
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
            diffuse_map: None,
        }
    }
}

/// Materials of one MTL file in declaration order
#[derive(Debug, Clone, Default)]
pub struct MtlLibrary {
    /// Parsed materials
    pub materials: Vec<MtlData>,
    /// Skipped lines
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents
    ///
    /// Malformed lines are skipped and reported in [`MtlLibrary::diagnostics`];
    /// unknown statements are ignored.
    pub fn parse(contents: &str) -> MtlLibrary {
        let mut library = MtlLibrary::default();

        for (line_index, line) in contents.lines().enumerate() {
            let line_num = line_index + 1;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else {
                continue;
            };

            if command == "newmtl" {
                let name = material_name(line.strip_prefix(command).unwrap_or_default());
                if name.is_empty() {
                    library.diagnostics.push(ParseDiagnostic::new(line_num, "newmtl missing material name"));
                } else {
                    library.materials.push(MtlData::named(name));
                }
                continue;
            }

            if !matches!(command, "Ka" | "Kd" | "Ks" | "Ns" | "map_Kd") {
                continue;
            }
            let Some(material) = library.materials.last_mut() else {
                library
                    .diagnostics
                    .push(ParseDiagnostic::new(line_num, format!("{command} before any newmtl")));
                continue;
            };

            let result = match command {
                "Ka" => Self::parse_vec3(&mut tokens, command).map(|v| material.ambient = v),
                "Kd" => Self::parse_vec3(&mut tokens, command).map(|v| material.diffuse = v),
                "Ks" => Self::parse_vec3(&mut tokens, command).map(|v| material.specular = v),
                "Ns" => Self::parse_f32(&mut tokens, command).map(|v| material.shininess = v),
                _ => Self::parse_texture_path(&mut tokens, command).map(|p| material.diffuse_map = Some(p)),
            };
            if let Err(message) = result {
                library.diagnostics.push(ParseDiagnostic::new(line_num, message));
            }
        }

        library
    }

    /// Parse a Vec3 color from RGB tokens
    fn parse_vec3<'a, I>(tokens: &mut I, command: &str) -> Result<Vec3, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, command)?;
        let g = Self::parse_f32(tokens, command)?;
        let b = Self::parse_f32(tokens, command)?;
        Ok(Vec3::new(r, g, b))
    }

    /// Parse a single f32 value
    fn parse_f32<'a, I>(tokens: &mut I, command: &str) -> Result<f32, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens.next().ok_or_else(|| format!("{command} missing value"))?;
        token
            .parse::<f32>()
            .map_err(|_| format!("{command} invalid float value '{token}'"))
    }

    /// Texture path is the rest of the line and may contain spaces
    fn parse_texture_path<'a, I>(tokens: &mut I, command: &str) -> Result<String, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(format!("{command} missing texture path"));
        }
        Ok(path.join(" "))
    }
}
