//! Serializable reports returned by the pipeline.
//!
//! [`QueryReport`] is the main entry point: the per-model scores for one query
//! together with the view audit trail, every view that was lost on the way
//! ([`ViewFailure`]) and a [`TimingBreakdown`] of the stages.

pub mod query;
pub mod timing;

pub use query::{FailureStage, QueryReport, ViewFailure};
pub use timing::{StageTiming, Stopwatch, TimingBreakdown};
