/// Wavefront OBJ loading for triangulated meshes.
/// Handles the `v`, `vt`, `vn` and `f` statements the renderer consumes;
/// other statements (groups, materials, smoothing) are skipped.
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::scene::mesh::{Face, Mesh};

#[derive(Debug, Error)]
pub enum WavefrontError {
    #[error("failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed `{kind}` statement")]
    Malformed { line: usize, kind: &'static str },
    #[error("line {line}: face index {index} is out of range")]
    IndexOutOfRange { line: usize, index: usize },
}

/// Reads and parses an OBJ file from disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, WavefrontError> {
    let source = fs::read_to_string(path)?;
    parse_obj(&source)
}

/// Parses OBJ source text. Faces must be triangles with position, UV and
/// normal indices (`f 1/1/1 2/2/2 3/3/3`); indices are 1-based in the
/// file and converted on load.
pub fn parse_obj(source: &str) -> Result<Mesh, WavefrontError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut faces: Vec<(usize, Face)> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let mut tokens = raw.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_floats(&mut tokens, line, "v")?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("vn") => {
                let [x, y, z] = parse_floats(&mut tokens, line, "vn")?;
                normals.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let [u, v] = parse_floats(&mut tokens, line, "vt")?;
                uvs.push(Vec2::new(u, v));
            }
            Some("f") => {
                let mut corners = [(0usize, 0usize, 0usize); 3];
                for corner in &mut corners {
                    let token = tokens.next().ok_or(WavefrontError::Malformed { line, kind: "f" })?;
                    *corner = parse_corner(token, line)?;
                }
                if tokens.next().is_some() {
                    // Quads and larger polygons are not triangulated here.
                    return Err(WavefrontError::Malformed { line, kind: "f" });
                }
                let face = Face {
                    vertices: [corners[0].0, corners[1].0, corners[2].0],
                    uvs: [corners[0].1, corners[1].1, corners[2].1],
                    normals: [corners[0].2, corners[1].2, corners[2].2],
                };
                faces.push((line, face));
            }
            _ => {}
        }
    }

    // Faces may reference attributes declared after them, so ranges are
    // checked once everything is read.
    for &(line, face) in &faces {
        check_range(&face.vertices, positions.len(), line)?;
        check_range(&face.uvs, uvs.len(), line)?;
        check_range(&face.normals, normals.len(), line)?;
    }

    let faces = faces.into_iter().map(|(_, face)| face).collect();
    Ok(Mesh::new(positions, normals, uvs, faces))
}

fn parse_floats<'a, const N: usize>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    kind: &'static str,
) -> Result<[f32; N], WavefrontError> {
    let mut out = [0.0f32; N];
    for slot in &mut out {
        *slot = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or(WavefrontError::Malformed { line, kind })?;
    }
    Ok(out)
}

fn parse_corner(token: &str, line: usize) -> Result<(usize, usize, usize), WavefrontError> {
    let mut parts = token.split('/');
    let v = parse_index(parts.next(), line)?;
    let vt = parse_index(parts.next(), line)?;
    let vn = parse_index(parts.next(), line)?;
    if parts.next().is_some() {
        return Err(WavefrontError::Malformed { line, kind: "f" });
    }
    Ok((v, vt, vn))
}

fn parse_index(part: Option<&str>, line: usize) -> Result<usize, WavefrontError> {
    part.and_then(|p| p.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1))
        .ok_or(WavefrontError::Malformed { line, kind: "f" })
}

fn check_range(indices: &[usize; 3], len: usize, line: usize) -> Result<(), WavefrontError> {
    for &index in indices {
        if index >= len {
            return Err(WavefrontError::IndexOutOfRange { line, index: index + 1 });
        }
    }
    Ok(())
}
