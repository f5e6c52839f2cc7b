use super::params::{CoveragePolicy, ViewPlanParams};
use super::pose::CameraPose;
use super::spec::{Facing, LookDirection, ViewSpec};
use crate::error::{Error, Result};
use crate::image::Raster;
use crate::pose::PrincipalFrame;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

const ORTHONORMAL_TOL: f64 = 1e-6;

/// How the raster for a planned view is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ViewStrategy {
    /// Invoke the renderer with the view's camera pose.
    Rendered,
    /// Rotate the raster of view `base` counter-clockwise by quarter turns.
    RotatedFrom { base: usize, quarter_turns: u8 },
    /// Mirror the raster of view `base` left-right.
    ReflectedFrom { base: usize },
}

impl ViewStrategy {
    pub fn base(&self) -> Option<usize> {
        match *self {
            ViewStrategy::Rendered => None,
            ViewStrategy::RotatedFrom { base, .. } | ViewStrategy::ReflectedFrom { base } => {
                Some(base)
            }
        }
    }

    /// Produce this view's raster from its base view's raster.
    pub fn derive(&self, base: &Raster) -> Option<Raster> {
        match *self {
            ViewStrategy::Rendered => None,
            ViewStrategy::RotatedFrom { quarter_turns, .. } => Some(base.rotated_ccw(quarter_turns)),
            ViewStrategy::ReflectedFrom { .. } => Some(base.mirrored()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlannedView {
    pub index: usize,
    pub spec: ViewSpec,
    pub strategy: ViewStrategy,
    pub pose: CameraPose,
}

/// Reproducibility record for one planned view.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewAudit {
    pub index: usize,
    pub stem: String,
    pub spec: ViewSpec,
    pub strategy: ViewStrategy,
}

/// Ordered views to produce for one model.
#[derive(Clone, Debug, Serialize)]
pub struct ViewPlan {
    pub resolution: u32,
    pub views: Vec<PlannedView>,
}

impl ViewPlan {
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn specs(&self) -> impl Iterator<Item = &ViewSpec> {
        self.views.iter().map(|v| &v.spec)
    }

    /// Number of views that need the renderer.
    pub fn renderer_invocations(&self) -> usize {
        self.views
            .iter()
            .filter(|v| v.strategy == ViewStrategy::Rendered)
            .count()
    }

    pub fn audit(&self) -> Vec<ViewAudit> {
        self.views
            .iter()
            .map(|v| ViewAudit {
                index: v.index,
                stem: v.spec.stem(),
                spec: v.spec,
                strategy: v.strategy,
            })
            .collect()
    }
}

struct Dimensions {
    directions: Vec<LookDirection>,
    facings: Vec<Facing>,
    rotation_steps: usize,
    reflections: Vec<bool>,
}

/// Enumerate the views `params.policy` requests around `frame`.
pub fn plan_views(frame: &PrincipalFrame, params: &ViewPlanParams) -> Result<ViewPlan> {
    validate(frame, params)?;
    let dims = dimensions(&params.policy)?;

    type Key = (LookDirection, Facing, usize, bool);
    let mut seen: HashMap<Key, usize> = HashMap::new();
    let mut views = Vec::with_capacity(params.policy.view_count());

    for &direction in &dims.directions {
        for &facing in &dims.facings {
            for rotation in 0..dims.rotation_steps {
                for &reflected in &dims.reflections {
                    let spec = ViewSpec {
                        direction,
                        rotation,
                        rotation_steps: dims.rotation_steps,
                        reflected,
                        facing,
                    };
                    let index = views.len();
                    let strategy = if params.use_image_transforms {
                        choose_strategy(&spec, |key| seen.get(&key).copied())
                    } else {
                        ViewStrategy::Rendered
                    };
                    let key = (direction, facing, rotation, reflected);
                    if seen.insert(key, index).is_some() {
                        return Err(Error::InvalidViewPlan(format!(
                            "duplicate view {}",
                            spec.stem()
                        )));
                    }
                    views.push(PlannedView {
                        index,
                        spec,
                        strategy,
                        pose: CameraPose::for_view(frame, &spec, params.camera_distance),
                    });
                }
            }
        }
    }

    let plan = ViewPlan {
        resolution: params.resolution,
        views,
    };
    debug!(
        "plan_views: policy={:?} views={} renders={}",
        params.policy,
        plan.len(),
        plan.renderer_invocations()
    );
    Ok(plan)
}

fn choose_strategy<F>(spec: &ViewSpec, lookup: F) -> ViewStrategy
where
    F: Fn((LookDirection, Facing, usize, bool)) -> Option<usize>,
{
    if spec.reflected {
        if let Some(base) = lookup((spec.direction, spec.facing, spec.rotation, false)) {
            return ViewStrategy::ReflectedFrom { base };
        }
    }
    if spec.rotation > 0 && !spec.reflected {
        if let (Some(quarter_turns), Some(base)) = (
            spec.quarter_turns(),
            lookup((spec.direction, spec.facing, 0, false)),
        ) {
            return ViewStrategy::RotatedFrom {
                base,
                quarter_turns,
            };
        }
    }
    ViewStrategy::Rendered
}

fn validate(frame: &PrincipalFrame, params: &ViewPlanParams) -> Result<()> {
    if !frame.is_orthonormal(ORTHONORMAL_TOL) {
        return Err(Error::InvalidViewPlan(format!(
            "principal axes are not orthonormal: {}",
            frame.axes
        )));
    }
    if params.resolution == 0 {
        return Err(Error::InvalidViewPlan("resolution must be positive".into()));
    }
    if !params.camera_distance.is_finite() || params.camera_distance <= 0.0 {
        return Err(Error::InvalidViewPlan(format!(
            "camera distance must be positive, got {}",
            params.camera_distance
        )));
    }
    Ok(())
}

fn dimensions(policy: &CoveragePolicy) -> Result<Dimensions> {
    fn axes(ids: &[usize]) -> Vec<LookDirection> {
        ids.iter().map(|&i| LookDirection::Axis(i)).collect()
    }
    let dims = match policy {
        CoveragePolicy::Minimal => Dimensions {
            directions: axes(&[0]),
            facings: vec![Facing::Front],
            rotation_steps: 1,
            reflections: vec![false],
        },
        CoveragePolicy::Full => Dimensions {
            directions: axes(&[0, 1, 2]),
            facings: vec![Facing::Front, Facing::Back],
            rotation_steps: 4,
            reflections: vec![false, true],
        },
        CoveragePolicy::Octahedral => Dimensions {
            directions: (0..8).map(LookDirection::Octant).collect(),
            facings: vec![Facing::Front],
            rotation_steps: 3,
            reflections: vec![false],
        },
        CoveragePolicy::Custom {
            axes: ids,
            rotations,
            reflections,
            front_and_back,
        } => {
            if ids.is_empty() {
                return Err(Error::InvalidViewPlan("no axes requested".into()));
            }
            if let Some(bad) = ids.iter().find(|&&i| i > 2) {
                return Err(Error::InvalidViewPlan(format!(
                    "axis index {bad} out of range 0..3"
                )));
            }
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != ids.len() {
                return Err(Error::InvalidViewPlan(format!(
                    "axes {ids:?} contain duplicates"
                )));
            }
            if *rotations == 0 {
                return Err(Error::InvalidViewPlan(
                    "at least one rotation step is required".into(),
                ));
            }
            Dimensions {
                directions: axes(ids.as_slice()),
                facings: if *front_and_back {
                    vec![Facing::Front, Facing::Back]
                } else {
                    vec![Facing::Front]
                },
                rotation_steps: *rotations,
                reflections: if *reflections {
                    vec![false, true]
                } else {
                    vec![false]
                },
            }
        }
    };
    Ok(dims)
}
