//! End-to-end identification of 3D models.
//!
//! Overview
//! - [`Match3d::register`] canonicalizes a model, renders its view plan and
//!   ingests every view into the signature index under one provenance record.
//! - [`Match3d::identify`] runs the same canonicalize → plan → render/derive
//!   stages for a query model, searches the index with every view and
//!   aggregates the neighbour lists into a per-model ranking.
//! - [`Match3d::identify_all`] fans queries out over a fixed-size worker pool.
//!
//! Resources
//! - Each worker owns one renderer slot; a model's views are rendered inside a
//!   single scoped session on that slot.
//! - Every external call is retried per view under [`RetryPolicy`]. Views that
//!   still fail are reported as [`ViewFailure`]s and excluded from
//!   aggregation.
//!
//! [`RetryPolicy`]: crate::render::RetryPolicy
//! [`ViewFailure`]: crate::diagnostics::ViewFailure

mod engine;
pub mod params;

pub use engine::{Match3d, ModelInput, Registration};
pub use params::PipelineParams;
