use super::spec::{LookDirection, ViewSpec};
use crate::pose::PrincipalFrame;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::f64::consts::TAU;

/// Camera placement handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub light: Point3<f64>,
    /// Unit vector from the camera towards the origin.
    pub look: Vector3<f64>,
    /// Unit screen-up vector, orthogonal to `look`.
    pub up: Vector3<f64>,
    /// Unit screen-right vector. `look × up`, negated when mirrored.
    pub right: Vector3<f64>,
    pub mirrored: bool,
}

impl CameraPose {
    /// Pose for `spec` in `frame` at `distance` from the origin.
    pub fn for_view(frame: &PrincipalFrame, spec: &ViewSpec, distance: f64) -> Self {
        let (dir, up0) = match spec.direction {
            LookDirection::Axis(i) => (
                frame.axis(i) * spec.facing.sign(),
                frame.axis((i + 1) % 3),
            ),
            LookDirection::Octant(k) => {
                let d = octant_direction(frame, k) * spec.facing.sign();
                let a2 = frame.axis(2);
                (d, (a2 - d * a2.dot(&d)).normalize())
            }
        };
        let look = -dir;
        let right0 = look.cross(&up0);
        let (c, s) = roll_cos_sin(spec.rotation, spec.rotation_steps);
        // Roll (up0, right0) about `look`; the image content turns
        // counter-clockwise. Right-angle rolls are exact signed swaps.
        let up = up0 * c + right0 * s;
        let mut right = right0 * c - up0 * s;
        if spec.reflected {
            right = -right;
        }
        let position = Point3::from(dir * distance);
        Self {
            position,
            light: position,
            look,
            up,
            right,
            mirrored: spec.reflected,
        }
    }

    /// Screen coordinates `(right, up)` of a world point.
    pub fn project(&self, p: &Point3<f64>) -> (f64, f64) {
        (p.coords.dot(&self.right), p.coords.dot(&self.up))
    }
}

fn octant_direction(frame: &PrincipalFrame, k: u8) -> Vector3<f64> {
    let sign = |bit: u8| if k & (1 << bit) != 0 { -1.0 } else { 1.0 };
    (frame.axis(0) * sign(0) + frame.axis(1) * sign(1) + frame.axis(2) * sign(2)).normalize()
}

/// Exact values for right-angle rolls so derived rasters match re-renders.
fn roll_cos_sin(rotation: usize, steps: usize) -> (f64, f64) {
    let steps = steps.max(1);
    if (rotation * 4) % steps == 0 {
        match ((rotation * 4) / steps) % 4 {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        }
    } else {
        let theta = TAU * rotation as f64 / steps as f64;
        (theta.cos(), theta.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::spec::Facing;

    #[test]
    fn front_view_of_axis_zero_looks_back_at_origin() {
        let pose = CameraPose::for_view(&PrincipalFrame::identity(), &ViewSpec::front(0), 5.0);
        assert_eq!(pose.position, Point3::new(5.0, 0.0, 0.0));
        assert_eq!(pose.look, -Vector3::x());
        assert_eq!(pose.up, Vector3::y());
        assert!((pose.right + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn quarter_roll_turns_projection_counter_clockwise() {
        let frame = PrincipalFrame::identity();
        let base = CameraPose::for_view(&frame, &ViewSpec::front(0), 5.0);
        let mut spec = ViewSpec::front(0);
        spec.rotation_steps = 4;
        spec.rotation = 1;
        let rolled = CameraPose::for_view(&frame, &spec, 5.0);
        let p = Point3::new(0.3, 0.7, -0.2);
        let (s, t) = base.project(&p);
        let (s1, t1) = rolled.project(&p);
        assert!((s1 + t).abs() < 1e-12 && (t1 - s).abs() < 1e-12);
    }

    #[test]
    fn reflection_negates_right_axis_only() {
        let frame = PrincipalFrame::identity();
        let mut spec = ViewSpec::front(1);
        spec.facing = Facing::Back;
        let plain = CameraPose::for_view(&frame, &spec, 5.0);
        spec.reflected = true;
        let mirrored = CameraPose::for_view(&frame, &spec, 5.0);
        assert_eq!(plain.up, mirrored.up);
        assert_eq!(plain.right, -mirrored.right);
        assert_eq!(plain.position, Point3::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn octant_pose_is_orthonormal() {
        let spec = ViewSpec {
            direction: LookDirection::Octant(5),
            rotation: 2,
            rotation_steps: 3,
            reflected: false,
            facing: Facing::Front,
        };
        let pose = CameraPose::for_view(&PrincipalFrame::identity(), &spec, 5.0);
        assert!((pose.look.norm() - 1.0).abs() < 1e-12);
        assert!((pose.up.norm() - 1.0).abs() < 1e-12);
        assert!(pose.look.dot(&pose.up).abs() < 1e-12);
        assert!(pose.right.dot(&pose.up).abs() < 1e-12);
        let expected = Vector3::new(-1.0, 1.0, -1.0).normalize() * 5.0;
        assert!((pose.position.coords - expected).norm() < 1e-12);
    }
}
