//! Wavefront OBJ import/export for convex hulls

use crate::types::{ConvexHull3D, Vertex};
use crate::{ConvexHullError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write a convex hull in OBJ format
///
/// Every input vertex is written (so face indices match the hull's), followed
/// by one normal per face and the faces themselves with 1-based indices.
pub fn write_obj<W: Write>(hull: &ConvexHull3D, mut out: W) -> std::io::Result<()> {
    writeln!(out, "# Convex Hull OBJ Export")?;
    writeln!(out, "# Vertices: {}", hull.num_vertices())?;
    writeln!(out, "# Faces: {}", hull.num_faces())?;
    writeln!(out)?;

    for vertex in hull.vertices() {
        writeln!(out, "v {} {} {}", vertex.x, vertex.y, vertex.z)?;
    }
    writeln!(out)?;

    for face in hull.faces() {
        let normal = face.normal(hull.vertices());
        writeln!(out, "vn {} {} {}", normal.x, normal.y, normal.z)?;
    }
    writeln!(out)?;

    for (i, face) in hull.faces().iter().enumerate() {
        let n = i + 1;
        writeln!(
            out,
            "f {}//{n} {}//{n} {}//{n}",
            face.v0 + 1,
            face.v1 + 1,
            face.v2 + 1
        )?;
    }

    out.flush()
}

/// Export a convex hull to an OBJ file
pub fn export_obj<P: AsRef<Path>>(hull: &ConvexHull3D, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_obj(hull, BufWriter::new(file))?;
    Ok(())
}

/// Load vertices from a Wavefront OBJ file
///
/// Only `v x y z` lines are read; faces, normals, texture coordinates and
/// malformed vertex lines are skipped.
pub fn load_obj_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<Vertex>> {
    let reader = BufReader::new(File::open(path)?);
    let mut vertices = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let Some(rest) = line.trim().strip_prefix("v ") else {
            continue;
        };
        let coords: Vec<f64> = rest
            .split_whitespace()
            .map_while(|c| c.parse().ok())
            .collect();
        if let [x, y, z, ..] = coords[..] {
            vertices.push(Vertex::new(x, y, z));
        }
    }

    if vertices.is_empty() {
        Err(ConvexHullError::InsufficientVertices { count: 0 })
    } else {
        Ok(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn test_write_obj() {
        let hull = ConvexHull3D::build(&testdata::tetrahedron_vertices()).unwrap();
        let mut buffer = Vec::new();
        write_obj(&hull, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces.len(), 4);
        assert!(faces[0].ends_with("//1"));
    }

    #[test]
    fn test_obj_roundtrip() {
        let vertices = testdata::icosahedron_vertices();
        let hull = ConvexHull3D::build(&vertices).unwrap();
        let path = std::env::temp_dir().join("math_audio_quickhull_icosahedron.obj");

        export_obj(&hull, &path).unwrap();
        let loaded = load_obj_vertices(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, vertices);
    }

    #[test]
    fn test_load_skips_other_lines() {
        let path = std::env::temp_dir().join("math_audio_quickhull_partial.obj");
        std::fs::write(
            &path,
            "# comment\nv 1 2 3\nvn 0 0 1\nv 4 five 6\n\n  v 7 8 9\nf 1 2 3\n",
        )
        .unwrap();
        let loaded = load_obj_vertices(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            loaded,
            vec![Vertex::new(1.0, 2.0, 3.0), Vertex::new(7.0, 8.0, 9.0)]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_obj_vertices("/nonexistent/hull.obj").unwrap_err();
        assert!(err.is_io_error());
    }
}
