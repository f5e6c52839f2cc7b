use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the camera sits on the positive or negative side of its axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Front,
    Back,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Facing::Front => 1.0,
            Facing::Back => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Back => "back",
        }
    }
}

/// Direction the camera is placed along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookDirection {
    /// Principal axis `0..3`.
    Axis(usize),
    /// One of the 8 directions `±a0 ± a1 ± a2`; bit `i` set negates axis `i`.
    Octant(u8),
}

impl fmt::Display for LookDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookDirection::Axis(i) => write!(f, "{i}"),
            LookDirection::Octant(k) => write!(f, "o{k}"),
        }
    }
}

/// One canonical camera pose relative to the principal frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewSpec {
    pub direction: LookDirection,
    /// In-plane roll step in `0..rotation_steps`.
    pub rotation: usize,
    /// Number of roll steps in a full turn.
    pub rotation_steps: usize,
    pub reflected: bool,
    pub facing: Facing,
}

impl ViewSpec {
    /// Unrolled, unmirrored front view of `axis`; the minimal policy's only view.
    pub fn front(axis: usize) -> Self {
        Self {
            direction: LookDirection::Axis(axis),
            rotation: 0,
            rotation_steps: 1,
            reflected: false,
            facing: Facing::Front,
        }
    }

    pub fn rotation_degrees(&self) -> f64 {
        360.0 * self.rotation as f64 / self.rotation_steps.max(1) as f64
    }

    /// Roll expressed in quarter turns, when it is a multiple of 90°.
    pub fn quarter_turns(&self) -> Option<u8> {
        let steps = self.rotation_steps.max(1);
        ((self.rotation * 4) % steps == 0).then(|| (((self.rotation * 4) / steps) % 4) as u8)
    }

    /// File-name stem `"{direction}.{rotation}.{facing}.{reflection}"`.
    pub fn stem(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.direction,
            self.rotation,
            self.facing.as_str(),
            u8::from(self.reflected)
        )
    }
}
