//! Parameter types configuring the identification pipeline.

use crate::pose::PoseParams;
use crate::render::RetryPolicy;
use crate::scoring::AggregatorParams;
use crate::views::ViewPlanParams;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub pose: PoseParams,
    pub view_plan: ViewPlanParams,
    pub aggregator: AggregatorParams,
    /// Applied independently to every render, search, ingest and record call.
    pub retry: RetryPolicy,
    /// Advisory cutoff passed to signature searches.
    pub distance_cutoff: f64,
    /// Size of the worker pool shared by model- and view-level parallelism.
    pub workers: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            pose: PoseParams::default(),
            view_plan: ViewPlanParams::default(),
            aggregator: AggregatorParams::default(),
            retry: RetryPolicy::default(),
            distance_cutoff: 0.5,
            workers: 4,
        }
    }
}
