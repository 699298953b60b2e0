//! STL input/output for [`TriangleMesh`], binary and ASCII.
//!
//! Binary STL layout:
//! - 80-byte header (arbitrary text)
//! - u32 triangle count (little-endian)
//! - per triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::errors::MeshError;
use crate::mesh::TriangleMesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Encode a mesh as binary STL.
pub fn write_binary_stl(mesh: &TriangleMesh, name: &str) -> Result<Vec<u8>, MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::Empty);
    }

    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + tri_count * RECORD_LEN);

    let header = format!("binary STL: {}", name);
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(HEADER_LEN)]);
    buf.resize(HEADER_LEN, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for i in 0..tri_count {
        let n = mesh.face_normal(i).unwrap_or([0.0, 0.0, 1.0]);
        for c in n {
            buf.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for p in mesh.triangle(i) {
            for c in p {
                buf.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Encode a mesh as ASCII STL.
pub fn write_ascii_stl(mesh: &TriangleMesh, name: &str) -> Result<String, MeshError> {
    if mesh.is_empty() {
        return Err(MeshError::Empty);
    }

    let mut out = String::with_capacity(mesh.triangle_count() * 300);
    let _ = writeln!(out, "solid {}", name);
    for i in 0..mesh.triangle_count() {
        let [nx, ny, nz] = mesh.face_normal(i).unwrap_or([0.0, 0.0, 1.0]);
        let _ = writeln!(out, "  facet normal {} {} {}", nx as f32, ny as f32, nz as f32);
        out.push_str("    outer loop\n");
        for [x, y, z] in mesh.triangle(i) {
            let _ = writeln!(out, "      vertex {} {} {}", x as f32, y as f32, z as f32);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    let _ = writeln!(out, "endsolid {}", name);
    Ok(out)
}

/// Decode STL bytes (binary or ASCII) into a welded mesh.
///
/// Binary is recognized by its exact length. Some exporters start binary
/// headers with "solid", so the text prefix alone is not trusted.
pub fn read_stl(bytes: &[u8]) -> Result<TriangleMesh, MeshError> {
    let soup = if binary_length_matches(bytes) {
        read_binary(bytes)?
    } else if starts_with_solid(bytes) {
        read_ascii(bytes)?
    } else {
        return Err(match declared_binary_len(bytes)? {
            Some(expected) => MeshError::Truncated {
                expected,
                found: bytes.len(),
            },
            None => MeshError::Malformed {
                reason: "not a binary or ASCII STL".to_string(),
            },
        });
    };

    if soup.is_empty() {
        return Err(MeshError::Empty);
    }
    let mesh = TriangleMesh::from_soup(&soup);
    debug!(
        triangles = mesh.triangle_count(),
        vertices = mesh.vertex_count(),
        "STL decoded"
    );
    Ok(mesh)
}

/// Write a mesh to `path` as binary STL.
pub fn save_stl(mesh: &TriangleMesh, path: &Path) -> Result<(), MeshError> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let bytes = write_binary_stl(mesh, name)?;
    std::fs::write(path, bytes).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an STL file from `path`.
pub fn load_stl(path: &Path) -> Result<TriangleMesh, MeshError> {
    let bytes = std::fs::read(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_stl(&bytes)
}

/// Size of a binary STL holding the triangle count in its header, or `None`
/// when the buffer is too short to hold a count.
fn declared_binary_len(bytes: &[u8]) -> Result<Option<usize>, MeshError> {
    let Some(count) = bytes.get(HEADER_LEN..HEADER_LEN + 4) else {
        return Ok(None);
    };
    let count = u32::from_le_bytes([count[0], count[1], count[2], count[3]]);
    usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(RECORD_LEN))
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        .map(Some)
        .ok_or_else(|| MeshError::Malformed {
            reason: format!("declared triangle count {count} exceeds the addressable size"),
        })
}

fn starts_with_solid(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .is_some_and(|start| bytes[start..].starts_with(b"solid"))
}

fn binary_length_matches(bytes: &[u8]) -> bool {
    matches!(declared_binary_len(bytes), Ok(Some(len)) if len == bytes.len())
}

fn read_binary(bytes: &[u8]) -> Result<Vec<[[f32; 3]; 3]>, MeshError> {
    let records = &bytes[HEADER_LEN + 4..];
    let mut soup = Vec::with_capacity(records.len() / RECORD_LEN);
    for record in records.chunks_exact(RECORD_LEN) {
        let mut tri = [[0f32; 3]; 3];
        for (v, vertex) in tri.iter_mut().enumerate() {
            for (c, coord) in vertex.iter_mut().enumerate() {
                // Skip the 12-byte normal.
                let at = 12 + (v * 3 + c) * 4;
                *coord = f32::from_le_bytes([
                    record[at],
                    record[at + 1],
                    record[at + 2],
                    record[at + 3],
                ]);
            }
        }
        if tri.iter().flatten().any(|c| !c.is_finite()) {
            return Err(MeshError::Malformed {
                reason: "non-finite vertex coordinate".to_string(),
            });
        }
        soup.push(tri);
    }
    Ok(soup)
}

fn read_ascii(bytes: &[u8]) -> Result<Vec<[[f32; 3]; 3]>, MeshError> {
    let text = std::str::from_utf8(bytes).map_err(|e| MeshError::Malformed {
        reason: format!("ASCII STL is not UTF-8: {e}"),
    })?;

    let mut soup = Vec::new();
    let mut current: Vec<[f32; 3]> = Vec::with_capacity(3);
    for (line_no, line) in text.lines().enumerate() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("vertex") => {
                let mut p = [0f32; 3];
                for coord in &mut p {
                    *coord = words
                        .next()
                        .and_then(|w| w.parse::<f32>().ok())
                        .filter(|c| c.is_finite())
                        .ok_or_else(|| MeshError::Malformed {
                            reason: format!("bad vertex on line {}", line_no + 1),
                        })?;
                }
                current.push(p);
            }
            Some("endloop") => {
                let tri: [[f32; 3]; 3] =
                    current
                        .as_slice()
                        .try_into()
                        .map_err(|_| MeshError::Malformed {
                            reason: format!(
                                "facet ending on line {} has {} vertices",
                                line_no + 1,
                                current.len()
                            ),
                        })?;
                soup.push(tri);
                current.clear();
            }
            _ => {}
        }
    }
    if !current.is_empty() {
        return Err(MeshError::Malformed {
            reason: "unterminated facet".to_string(),
        });
    }
    Ok(soup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tests::unit_cube;

    #[test]
    fn binary_header_is_80_bytes_and_names_solid() {
        let stl = write_binary_stl(&unit_cube(), "test").unwrap();
        assert_eq!(stl.len(), 80 + 4 + 12 * 50);
        let header = String::from_utf8_lossy(&stl[..80]);
        assert!(header.contains("test"));
        assert_eq!(u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]), 12);
    }

    #[test]
    fn binary_decode_welds_vertices() {
        let stl = write_binary_stl(&unit_cube(), "cube").unwrap();
        let mesh = read_stl(&stl).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn ascii_decode() {
        let text = write_ascii_stl(&unit_cube(), "cube").unwrap();
        assert!(text.starts_with("solid cube"));
        assert!(text.trim_end().ends_with("endsolid cube"));
        let mesh = read_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn truncated_binary_is_reported() {
        let stl = write_binary_stl(&unit_cube(), "cube").unwrap();
        let err = read_stl(&stl[..stl.len() - 10]).unwrap_err();
        assert!(matches!(err, MeshError::Truncated { .. }), "{err:?}");
    }

    #[test]
    fn huge_declared_count_is_an_error() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; RECORD_LEN]);
        let err = read_stl(&bytes).unwrap_err();
        assert!(
            matches!(err, MeshError::Truncated { .. } | MeshError::Malformed { .. }),
            "{err:?}"
        );
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            err,
            MeshError::Truncated { expected, found }
                if expected == 84 + u32::MAX as usize * 50 && found == 134
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            read_stl(b"hello"),
            Err(MeshError::Malformed { .. })
        ));
        assert!(matches!(
            read_stl(b"solid x\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0\n"),
            Err(MeshError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_mesh_cannot_be_written() {
        assert!(matches!(
            write_binary_stl(&TriangleMesh::default(), "x"),
            Err(MeshError::Empty)
        ));
        assert!(matches!(read_stl(b"solid x\nendsolid x\n"), Err(MeshError::Empty)));
    }
}
