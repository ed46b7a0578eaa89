//! OBJ text serialization.
//!
//! This module writes a [`ReliefMesh`] as Wavefront OBJ text and reads it
//! back. Output order is fixed: header comment, `v` records, `vt` records
//! when the mesh is textured, `vn` records, then `f` records. Coordinates
//! are formatted with six decimal digits to bound output size and keep
//! byte-identical output for identical inputs.
//!
//! Face corners are written as `v//n` (or `v/t/n` when textured) with the
//! same 1-based ordinal for every reference, since vertices, normals, and
//! UVs are parallel arrays. The writer never reorders or deduplicates
//! records; it validates the mesh first and treats any inconsistency as a
//! construction bug.

use super::{Face, ReliefMesh};
use crate::geometry::{Vec2, Vec3};
use crate::{CoordF, Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write a mesh as OBJ text.
pub fn write_obj<W: Write>(writer: &mut W, mesh: &ReliefMesh) -> Result<()> {
    mesh.validate()?;

    writeln!(writer, "# relief mesh export")?;
    writeln!(writer)?;

    for v in mesh.vertices() {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for uv in mesh.uvs() {
        writeln!(writer, "vt {:.6} {:.6}", uv.x, uv.y)?;
    }
    for n in mesh.normals() {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }

    if mesh.has_uvs() {
        for face in mesh.faces() {
            let [a, b, c] = face.indices;
            writeln!(
                writer,
                "f {0}/{0}/{0} {1}/{1}/{1} {2}/{2}/{2}",
                a + 1,
                b + 1,
                c + 1
            )?;
        }
    } else {
        for face in mesh.faces() {
            let [a, b, c] = face.indices;
            writeln!(writer, "f {0}//{0} {1}//{1} {2}//{2}", a + 1, b + 1, c + 1)?;
        }
    }

    Ok(())
}

/// Serialize a mesh to an OBJ string.
pub fn obj_to_string(mesh: &ReliefMesh) -> Result<String> {
    let mut buf = Vec::with_capacity(32 + mesh.vertex_count() * 64 + mesh.face_count() * 40);
    write_obj(&mut buf, mesh)?;
    String::from_utf8(buf).map_err(|_| Error::Mesh("OBJ output was not valid UTF-8".into()))
}

/// Save a mesh to an OBJ file.
pub fn save_obj<P: AsRef<Path>>(path: P, mesh: &ReliefMesh) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

/// Load a mesh from an OBJ file.
///
/// Understands the subset this crate writes (`v`, `vt`, `vn`, `f`);
/// comments and unsupported records are skipped. Faces with more than
/// three corners are fan-triangulated. Files without `vn` records get
/// normals averaged from adjacent faces.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ReliefMesh> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parse OBJ text from a reader.
fn parse_obj<R: BufRead>(reader: R) -> Result<ReliefMesh> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first() {
            Some(&"v") => {
                if parts.len() < 4 {
                    return Err(Error::Mesh("Truncated v record".into()));
                }
                positions.push(Vec3::new(
                    parse_coord(parts[1], "v")?,
                    parse_coord(parts[2], "v")?,
                    parse_coord(parts[3], "v")?,
                ));
            }
            Some(&"vn") => {
                if parts.len() < 4 {
                    return Err(Error::Mesh("Truncated vn record".into()));
                }
                normals.push(Vec3::new(
                    parse_coord(parts[1], "vn")?,
                    parse_coord(parts[2], "vn")?,
                    parse_coord(parts[3], "vn")?,
                ));
            }
            Some(&"vt") => {
                if parts.len() < 3 {
                    return Err(Error::Mesh("Truncated vt record".into()));
                }
                uvs.push(Vec2::new(
                    parse_coord(parts[1], "vt")?,
                    parse_coord(parts[2], "vt")?,
                ));
            }
            Some(&"f") => {
                if parts.len() < 4 {
                    return Err(Error::Mesh("Face record has fewer than 3 corners".into()));
                }
                let mut corners = Vec::with_capacity(parts.len() - 1);
                for &field in &parts[1..] {
                    corners.push(parse_corner(field)?);
                }
                // Fan-triangulate anything beyond a triangle
                for k in 1..corners.len() - 1 {
                    faces.push(Face::new(corners[0], corners[k], corners[k + 1]));
                }
            }
            // Comments and unsupported record kinds
            _ => {}
        }
    }

    if faces.is_empty() {
        return Err(Error::Mesh("No faces found in OBJ data".into()));
    }
    let has_normals = !normals.is_empty();
    if has_normals && normals.len() != positions.len() {
        return Err(Error::Mesh(format!(
            "OBJ data has {} vertices but {} normals",
            positions.len(),
            normals.len()
        )));
    }
    let has_uvs = !uvs.is_empty();
    if has_uvs && uvs.len() != positions.len() {
        return Err(Error::Mesh(format!(
            "OBJ data has {} vertices but {} texture coordinates",
            positions.len(),
            uvs.len()
        )));
    }

    let mut mesh = ReliefMesh::with_capacity(positions.len(), faces.len());
    for (i, &position) in positions.iter().enumerate() {
        let normal = if has_normals {
            normals[i]
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        if has_uvs {
            mesh.add_vertex_with_uv(position, normal, uvs[i]);
        } else {
            mesh.add_vertex(position, normal);
        }
    }
    for face in faces {
        mesh.add_face(face);
    }
    mesh.validate()?;
    if !has_normals {
        mesh.recompute_vertex_normals();
    }
    Ok(mesh)
}

/// Parse one coordinate field of a record.
fn parse_coord(field: &str, record: &str) -> Result<CoordF> {
    field
        .parse()
        .map_err(|_| Error::Mesh(format!("Invalid coordinate in {record} record: {field}")))
}

/// Parse one face corner, returning a 0-based vertex index.
///
/// Accepts `i`, `i//n`, and `i/t/n` forms; only the vertex index is kept
/// since this crate stores normals and UVs parallel to vertices.
fn parse_corner(field: &str) -> Result<u32> {
    let vertex = field.split_once('/').map_or(field, |(v, _)| v);
    let idx: u32 = vertex
        .parse()
        .map_err(|_| Error::Mesh(format!("Invalid face corner: {field}")))?;
    if idx == 0 {
        return Err(Error::Mesh(format!(
            "Face corner index must be 1-based: {field}"
        )));
    }
    Ok(idx - 1)
}
