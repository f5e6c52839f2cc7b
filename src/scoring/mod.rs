//! Cross-view score aggregation.
//!
//! One query produces one neighbour list per searched view. A
//! [`ScoreAggregator`] folds those lists into a per-model [`ModelScore`] under
//! a [`RankingPolicy`]. Aggregators hold only their parameters, so one
//! instance can serve concurrent queries.

mod policies;

pub use policies::{best_single_image, composite, tournament};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One nearest-neighbour hit, already resolved to the candidate model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeighborHit {
    pub model: String,
    pub distance: f64,
}

impl NeighborHit {
    pub fn new(model: impl Into<String>, distance: f64) -> Self {
        Self {
            model: model.into(),
            distance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Mean of a fixed-size, sentinel-padded sample of distances.
    Composite,
    /// 0-based ranks of the best `max_matches` composite scores.
    Tournament { max_matches: usize },
    /// Per-model minimum over the best `n_per_view` hits of every view.
    BestSingleImage { n_per_view: usize },
}

impl Default for RankingPolicy {
    fn default() -> Self {
        RankingPolicy::BestSingleImage { n_per_view: 5 }
    }
}

impl RankingPolicy {
    pub fn tournament() -> Self {
        RankingPolicy::Tournament { max_matches: 5 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorParams {
    pub policy: RankingPolicy,
    /// Composite scores average exactly this many observations.
    pub padded_observations: usize,
    /// Distance used to pad candidates seen in fewer views.
    pub sentinel_distance: f64,
}

impl Default for AggregatorParams {
    fn default() -> Self {
        Self {
            policy: RankingPolicy::default(),
            padded_observations: 3,
            sentinel_distance: 1.0,
        }
    }
}

impl AggregatorParams {
    /// Rejects settings under which non-empty input would score no model.
    pub fn validate(&self) -> Result<()> {
        match self.policy {
            RankingPolicy::Tournament { max_matches: 0 } => {
                return Err(Error::Config("tournament max_matches must be positive".into()))
            }
            RankingPolicy::BestSingleImage { n_per_view: 0 } => {
                return Err(Error::Config("best-single-image n_per_view must be positive".into()))
            }
            _ => {}
        }
        if self.padded_observations == 0 {
            return Err(Error::Config("padded_observations must be positive".into()));
        }
        if !self.sentinel_distance.is_finite() {
            return Err(Error::Config(format!(
                "sentinel_distance must be finite, got {}",
                self.sentinel_distance
            )));
        }
        Ok(())
    }
}

/// Per-model outcome of one aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "scores", rename_all = "snake_case")]
pub enum ModelScore {
    /// Lower is more similar.
    Distances(BTreeMap<String, f64>),
    /// 0 is the best match.
    Ranks(BTreeMap<String, usize>),
}

impl ModelScore {
    pub fn len(&self) -> usize {
        match self {
            ModelScore::Distances(m) => m.len(),
            ModelScore::Ranks(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn distance(&self, model: &str) -> Option<f64> {
        match self {
            ModelScore::Distances(m) => m.get(model).copied(),
            ModelScore::Ranks(_) => None,
        }
    }

    pub fn rank(&self, model: &str) -> Option<usize> {
        match self {
            ModelScore::Ranks(m) => m.get(model).copied(),
            ModelScore::Distances(_) => None,
        }
    }

    /// Model ids ordered best first; ties fall back to id order.
    pub fn ranked_ids(&self) -> Vec<String> {
        match self {
            ModelScore::Distances(m) => {
                let mut entries: Vec<(&String, f64)> = m.iter().map(|(k, &v)| (k, v)).collect();
                entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
                entries.into_iter().map(|(k, _)| k.clone()).collect()
            }
            ModelScore::Ranks(m) => {
                let mut entries: Vec<(&String, usize)> = m.iter().map(|(k, &v)| (k, v)).collect();
                entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
                entries.into_iter().map(|(k, _)| k.clone()).collect()
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScoreAggregator {
    params: AggregatorParams,
}

impl ScoreAggregator {
    pub fn new(params: AggregatorParams) -> Self {
        Self { params }
    }

    pub fn with_policy(policy: RankingPolicy) -> Self {
        Self::new(AggregatorParams {
            policy,
            ..Default::default()
        })
    }

    pub fn params(&self) -> &AggregatorParams {
        &self.params
    }

    /// Reduce per-view neighbour lists to a per-model score.
    ///
    /// Never fails: sparse coverage is padded, and all-empty input yields an
    /// empty score.
    pub fn aggregate(&self, views: &[Vec<NeighborHit>]) -> ModelScore {
        let p = &self.params;
        match p.policy {
            RankingPolicy::Composite => ModelScore::Distances(composite(
                views,
                p.padded_observations,
                p.sentinel_distance,
            )),
            RankingPolicy::Tournament { max_matches } => ModelScore::Ranks(tournament(
                views,
                max_matches,
                p.padded_observations,
                p.sentinel_distance,
            )),
            RankingPolicy::BestSingleImage { n_per_view } => {
                ModelScore::Distances(best_single_image(views, n_per_view))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_returns_empty_for_empty_lists() {
        let views = vec![Vec::new(), Vec::new()];
        for policy in [
            RankingPolicy::Composite,
            RankingPolicy::tournament(),
            RankingPolicy::default(),
        ] {
            assert!(ScoreAggregator::with_policy(policy).aggregate(&views).is_empty());
        }
        assert!(ScoreAggregator::default().aggregate(&[]).is_empty());
    }

    #[test]
    fn zero_sized_policies_are_rejected() {
        for policy in [
            RankingPolicy::Tournament { max_matches: 0 },
            RankingPolicy::BestSingleImage { n_per_view: 0 },
        ] {
            let params = AggregatorParams {
                policy,
                ..Default::default()
            };
            assert!(matches!(params.validate(), Err(Error::Config(_))));
        }
        let unpadded = AggregatorParams {
            policy: RankingPolicy::Composite,
            padded_observations: 0,
            ..Default::default()
        };
        assert!(unpadded.validate().is_err());
        assert!(AggregatorParams::default().validate().is_ok());
    }

    #[test]
    fn every_policy_scores_non_empty_input() {
        let views = vec![vec![NeighborHit::new("a", 0.3)], Vec::new()];
        for policy in [
            RankingPolicy::Composite,
            RankingPolicy::tournament(),
            RankingPolicy::default(),
        ] {
            assert!(!ScoreAggregator::with_policy(policy).aggregate(&views).is_empty());
        }
    }

    #[test]
    fn ranked_ids_orders_best_first_with_id_tiebreak() {
        let score = ModelScore::Distances(
            [("c", 0.1), ("b", 0.4), ("a", 0.4)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );
        assert_eq!(score.ranked_ids(), vec!["c", "a", "b"]);
        let ranks = ModelScore::Ranks(
            [("x", 1usize), ("y", 0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        );
        assert_eq!(ranks.ranked_ids(), vec!["y", "x"]);
        assert_eq!(ranks.rank("x"), Some(1));
        assert_eq!(ranks.distance("x"), None);
    }

    #[test]
    fn policy_round_trips_through_json_config() {
        let params: AggregatorParams =
            serde_json::from_str(r#"{"policy":{"kind":"tournament","max_matches":3}}"#).unwrap();
        assert_eq!(params.policy, RankingPolicy::Tournament { max_matches: 3 });
        assert_eq!(params.padded_observations, 3);
    }
}
