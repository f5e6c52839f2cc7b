#![doc = include_str!("../README.md")]

// Core stages.
pub mod mesh;
pub mod pose;
pub mod scoring;
pub mod views;

// Evaluation against curated results.
pub mod benchmark;

// External collaborators and their reference implementations.
pub mod custody;
pub mod render;
pub mod signature;

// Orchestration, reports and plumbing.
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod pipeline;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{Error, Result};
pub use crate::pipeline::{Match3d, ModelInput, PipelineParams, Registration};

pub use crate::benchmark::{Benchmarker, GoldenGraph, GoldenTable, ScoreCard};
pub use crate::diagnostics::{QueryReport, ViewFailure};
pub use crate::pose::{PoseCanonicalizer, PrincipalFrame};
pub use crate::scoring::{ModelScore, NeighborHit, RankingPolicy, ScoreAggregator};
pub use crate::views::{plan_views, CoveragePolicy, ViewPlan, ViewPlanParams, ViewSpec};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use match3d::prelude::*;
///
/// # fn main() -> match3d::Result<()> {
/// let mesh = match3d::mesh::io::load_stl(std::path::Path::new("part.stl"))?;
/// let frame = PoseCanonicalizer::default().canonicalize(&mesh)?;
/// let plan = plan_views(
///     &frame,
///     &ViewPlanParams::default().with_policy(CoveragePolicy::Minimal),
/// )?;
/// println!("moments={:?} views={}", frame.moments, plan.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::mesh::{Mesh, MeshHandle};
    pub use crate::{
        plan_views, CoveragePolicy, Match3d, ModelScore, NeighborHit, PipelineParams,
        PoseCanonicalizer, PrincipalFrame, RankingPolicy, ScoreAggregator, ViewPlanParams,
    };
}
