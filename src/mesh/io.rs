//! STL loading.
use super::Mesh;
use crate::error::{Error, Result};
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Read a binary or ASCII STL file into a [`Mesh`].
pub fn load_stl(path: &Path) -> Result<Mesh> {
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {e}", path.display()),
        ))
    })?;
    let mut reader = BufReader::new(file);
    read_stl(&mut reader)
}

/// Parse STL data from any seekable reader.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh> {
    let indexed = stl_io::read_stl(reader)?;
    let vertex = |idx: usize| {
        let v = indexed.vertices[idx];
        Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)
    };
    let triangles: Vec<[Point3<f64>; 3]> = indexed
        .faces
        .iter()
        .map(|tri| {
            [
                vertex(tri.vertices[0]),
                vertex(tri.vertices[1]),
                vertex(tri.vertices[2]),
            ]
        })
        .collect();
    log::debug!(
        "load_stl: {} vertices, {} faces",
        indexed.vertices.len(),
        triangles.len()
    );
    Ok(Mesh::from_triangles(&triangles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TETRA: &str = "solid tetra
facet normal 0 0 -1
 outer loop
  vertex 0 0 0
  vertex 0 1 0
  vertex 1 0 0
 endloop
endfacet
facet normal 0 -1 0
 outer loop
  vertex 0 0 0
  vertex 1 0 0
  vertex 0 0 1
 endloop
endfacet
facet normal -1 0 0
 outer loop
  vertex 0 0 0
  vertex 0 0 1
  vertex 0 1 0
 endloop
endfacet
facet normal 1 1 1
 outer loop
  vertex 1 0 0
  vertex 0 1 0
  vertex 0 0 1
 endloop
endfacet
endsolid tetra
";

    #[test]
    fn reads_ascii_tetrahedron() {
        let mut cursor = Cursor::new(TETRA.as_bytes().to_vec());
        let mesh = read_stl(&mut cursor).unwrap();
        assert_eq!(mesh.len(), 4);
        let expected = 1.5 + 3f64.sqrt() / 2.0;
        assert!((mesh.total_area() - expected).abs() < 1e-6);
    }
}
