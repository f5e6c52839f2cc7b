use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// Symmetric 3×3 inertia tensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InertiaTensor {
    pub matrix: Matrix3<f64>,
}

impl InertiaTensor {
    /// Wrap `matrix`, symmetrizing away floating-point asymmetry.
    pub fn new(matrix: Matrix3<f64>) -> Self {
        Self {
            matrix: (matrix + matrix.transpose()) * 0.5,
        }
    }
}

/// Orthonormal principal axes (columns of `axes`) with their moments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PrincipalFrame {
    pub axes: Matrix3<f64>,
    pub moments: Vector3<f64>,
}

impl PrincipalFrame {
    pub fn new(axes: Matrix3<f64>, moments: Vector3<f64>) -> Self {
        Self { axes, moments }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::new(1.0, 2.0, 3.0))
    }

    #[inline]
    pub fn axis(&self, i: usize) -> Vector3<f64> {
        self.axes.column(i).into_owned()
    }

    #[inline]
    pub fn moment(&self, i: usize) -> f64 {
        self.moments[i]
    }

    /// True if every axis has unit norm and distinct axes are orthogonal.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let gram = self.axes.transpose() * self.axes;
        (gram - Matrix3::identity()).iter().all(|v| v.is_finite() && v.abs() <= tol)
    }

    /// True if two moments agree within relative tolerance `tol`, leaving the
    /// shared eigenspace free to rotate.
    pub fn has_repeated_moments(&self, tol: f64) -> bool {
        let scale = self.moments.amax().max(f64::MIN_POSITIVE);
        (0..3).any(|i| {
            ((i + 1)..3).any(|j| (self.moments[i] - self.moments[j]).abs() <= tol * scale)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skewed_axes_are_not_orthonormal() {
        let mut frame = PrincipalFrame::identity();
        frame.axes[(0, 1)] = 0.3;
        assert!(!frame.is_orthonormal(1e-6));
    }

    #[test]
    fn repeated_moments_detected() {
        let frame = PrincipalFrame::new(Matrix3::identity(), Vector3::new(1.0, 2.0, 2.0));
        assert!(frame.has_repeated_moments(1e-9));
        assert!(!PrincipalFrame::identity().has_repeated_moments(1e-9));
    }
}
