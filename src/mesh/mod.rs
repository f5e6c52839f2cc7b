//! Triangle meshes reduced to what canonicalization needs.
//!
//! Each face is a point mass located at its centroid with mass equal to its
//! area (uniform surface density). Vertex connectivity is not retained; the
//! renderer receives the original file through a [`MeshHandle`].

pub mod io;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One triangular face reduced to its area and centroid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub area: f64,
    pub centroid: Point3<f64>,
}

impl Face {
    /// Build a face from its three corner points.
    pub fn from_triangle(tri: &[Point3<f64>; 3]) -> Self {
        let e1 = tri[1] - tri[0];
        let e2 = tri[2] - tri[0];
        let area = 0.5 * e1.cross(&e2).norm();
        let centroid = Point3::from((tri[0].coords + tri[1].coords + tri[2].coords) / 3.0);
        Self { area, centroid }
    }
}

/// Immutable set of faces describing one solid model.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    pub fn from_triangles(triangles: &[[Point3<f64>; 3]]) -> Self {
        Self::new(triangles.iter().map(Face::from_triangle).collect())
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.faces.iter().map(|f| f.area).sum()
    }

    /// Area-weighted mean of the face centroids, `None` for zero total area.
    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        let total = self.total_area();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        let weighted = self
            .faces
            .iter()
            .fold(Vector3::zeros(), |acc, f| acc + f.centroid.coords * f.area);
        Some(Point3::from(weighted / total))
    }
}

/// Opaque reference to a model as handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle {
    /// Identity of the model (the key search results are reported under).
    pub model_id: String,
    /// Source file the renderer loads into its scene.
    pub path: PathBuf,
}

impl MeshHandle {
    pub fn new(model_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            model_id: model_id.into(),
            path: path.into(),
        }
    }
}
