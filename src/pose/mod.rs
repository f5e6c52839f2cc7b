//! Principal-axis canonicalization of a mesh.
//!
//! The inertia tensor of the face point-masses (taken about the area-weighted
//! centre of mass) is eigendecomposed into a [`PrincipalFrame`]. The frame is
//! only defined up to
//! - the sign of each eigenvector,
//! - the assignment of eigenvectors to "axis 0/1/2",
//! - an arbitrary in-plane rotation about any chosen axis (and within any
//!   eigenspace of repeated moments).
//!
//! None of these are resolved here. [`crate::views`] enumerates them.

mod frame;

pub use frame::{InertiaTensor, PrincipalFrame};

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use log::debug;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

const MIN_FACES: usize = 4;

/// Tolerances for [`PoseCanonicalizer`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseParams {
    /// Ratio of smallest to largest centroid-scatter eigenvalue below which
    /// the face centroids are treated as coplanar.
    pub coplanarity_tolerance: f64,
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            coplanarity_tolerance: 1e-9,
        }
    }
}

/// Computes principal frames of meshes.
#[derive(Clone, Debug, Default)]
pub struct PoseCanonicalizer {
    params: PoseParams,
}

impl PoseCanonicalizer {
    pub fn new(params: PoseParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PoseParams {
        &self.params
    }

    /// Eigendecompose the inertia tensor of `mesh`.
    ///
    /// Axes are sorted by ascending moment; equal moments keep the order the
    /// eigensolver produced them in.
    pub fn canonicalize(&self, mesh: &Mesh) -> Result<PrincipalFrame> {
        self.check_geometry(mesh)?;
        let tensor = inertia_tensor(mesh)?;
        let eig = SymmetricEigen::new(tensor.matrix);

        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));

        let mut axes = Matrix3::zeros();
        let mut moments = Vector3::zeros();
        for (dst, &src) in order.iter().enumerate() {
            let v = eig.eigenvectors.column(src).normalize();
            axes.set_column(dst, &v);
            moments[dst] = eig.eigenvalues[src];
        }
        if !moments.iter().all(|m| m.is_finite()) {
            return Err(Error::DegenerateMesh(
                "inertia eigendecomposition produced non-finite moments".into(),
            ));
        }
        debug!(
            "PoseCanonicalizer: faces={} moments=[{:.6}, {:.6}, {:.6}]",
            mesh.len(),
            moments[0],
            moments[1],
            moments[2]
        );
        Ok(PrincipalFrame::new(axes, moments))
    }

    fn check_geometry(&self, mesh: &Mesh) -> Result<()> {
        let total = mesh.total_area();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::DegenerateMesh(format!(
                "total face area is {total}"
            )));
        }
        if mesh.len() < MIN_FACES {
            return Err(Error::DegenerateMesh(format!(
                "{} faces, need at least {MIN_FACES} non-coplanar centroids",
                mesh.len()
            )));
        }
        let com = mesh
            .center_of_mass()
            .ok_or_else(|| Error::DegenerateMesh("no centre of mass".into()))?;
        let mut scatter = Matrix3::zeros();
        for face in mesh.faces() {
            let d = face.centroid - com;
            scatter += d * d.transpose();
        }
        let eig = SymmetricEigen::new(scatter);
        let max = eig.eigenvalues.max();
        let min = eig.eigenvalues.min();
        if !(max > 0.0) || min <= self.params.coplanarity_tolerance * max {
            return Err(Error::DegenerateMesh(format!(
                "face centroids span fewer than 3 dimensions (scatter eigenvalues min={min:.3e} max={max:.3e})"
            )));
        }
        Ok(())
    }
}

/// Inertia tensor of the face point-masses about the centre of mass.
///
/// Each face contributes `-area * [c]ₓ²`, where `[c]ₓ` is the cross-product
/// matrix of its centroid offset `c`.
pub fn inertia_tensor(mesh: &Mesh) -> Result<InertiaTensor> {
    let com = mesh
        .center_of_mass()
        .ok_or_else(|| Error::DegenerateMesh("zero total area".into()))?;
    let matrix = mesh.faces().iter().fold(Matrix3::zeros(), |acc, face| {
        let skew = (face.centroid - com).cross_matrix();
        acc - skew * skew * face.area
    });
    Ok(InertiaTensor::new(matrix))
}
