use super::TimingBreakdown;
use crate::pose::PrincipalFrame;
use crate::scoring::ModelScore;
use crate::views::ViewAudit;
use serde::Serialize;

/// Where a planned view was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Render,
    /// Base view for an image transform was unavailable.
    Derive,
    Search,
    Ingest,
}

/// A planned view excluded from aggregation or ingestion.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFailure {
    pub index: usize,
    pub stem: String,
    pub stage: FailureStage,
    pub attempts: u32,
    pub message: String,
}

/// Outcome of identifying one query model.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub model_id: String,
    pub frame: PrincipalFrame,
    pub scores: ModelScore,
    /// Candidate ids, best first.
    pub ranking: Vec<String>,
    pub audit: Vec<ViewAudit>,
    pub failures: Vec<ViewFailure>,
    pub timing: TimingBreakdown,
}

impl QueryReport {
    /// Views that contributed a neighbour list.
    pub fn searched_views(&self) -> usize {
        self.audit.len().saturating_sub(self.failures.len())
    }

    pub fn best_match(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }
}
