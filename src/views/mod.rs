//! Enumeration of canonical camera views around a [`PrincipalFrame`].
//!
//! Overview
//! - A [`ViewSpec`] names one pose relative to the principal frame: which
//!   direction the camera looks along, an in-plane roll step, a left-right
//!   reflection flag and a front/back flag.
//! - A [`CoveragePolicy`] selects which of those ambiguity dimensions are
//!   enumerated. The plan is the Cartesian product of the selected values in
//!   the order direction → facing → rotation → reflection.
//! - Each planned view carries a [`ViewStrategy`]: render it, or derive it from
//!   an earlier view by a quarter-turn rotation or a mirror of the raster.
//!   Derivation is only chosen where it reproduces a re-render exactly (roll
//!   angles that are multiples of 90°).
//!
//! Conventions
//! - The camera sits at `distance · d` and looks at the origin, with the light
//!   co-located. Roll step `k` of `R` turns the image counter-clockwise by
//!   `k · 360°/R`. Reflection negates the camera's right axis.
//!
//! [`PrincipalFrame`]: crate::pose::PrincipalFrame

mod params;
mod planner;
mod pose;
mod spec;

pub use params::{CoveragePolicy, ViewPlanParams};
pub use planner::{plan_views, PlannedView, ViewAudit, ViewPlan, ViewStrategy};
pub use pose::CameraPose;
pub use spec::{Facing, LookDirection, ViewSpec};
