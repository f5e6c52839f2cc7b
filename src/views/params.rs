use serde::{Deserialize, Serialize};

/// Which ambiguity dimensions a plan enumerates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CoveragePolicy {
    /// Axis 0, front, no roll, no reflection: one view.
    Minimal,
    /// 3 axes × 2 facings × 4 rolls × 2 reflections: 48 views.
    Full,
    /// 8 octant directions × 3 rolls of 120°: 24 views.
    Octahedral,
    /// Explicit selection of each dimension.
    Custom {
        axes: Vec<usize>,
        rotations: usize,
        reflections: bool,
        front_and_back: bool,
    },
}

impl CoveragePolicy {
    /// Number of views the policy requests.
    pub fn view_count(&self) -> usize {
        match self {
            CoveragePolicy::Minimal => 1,
            CoveragePolicy::Full => 48,
            CoveragePolicy::Octahedral => 24,
            CoveragePolicy::Custom {
                axes,
                rotations,
                reflections,
                front_and_back,
            } => {
                axes.len()
                    * rotations
                    * if *reflections { 2 } else { 1 }
                    * if *front_and_back { 2 } else { 1 }
            }
        }
    }
}

/// Parameters for [`plan_views`](super::plan_views).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPlanParams {
    pub policy: CoveragePolicy,
    /// Square render resolution in pixels.
    pub resolution: u32,
    /// Derive roll/reflection variants from rendered rasters where exact.
    pub use_image_transforms: bool,
    /// Camera (and light) distance from the origin.
    pub camera_distance: f64,
}

impl Default for ViewPlanParams {
    fn default() -> Self {
        Self {
            policy: CoveragePolicy::Full,
            resolution: 1024,
            use_image_transforms: true,
            camera_distance: 5.0,
        }
    }
}

impl ViewPlanParams {
    pub fn with_policy(mut self, policy: CoveragePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_image_transforms(mut self, enabled: bool) -> Self {
        self.use_image_transforms = enabled;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }
}
