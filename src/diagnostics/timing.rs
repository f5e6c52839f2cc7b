use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock time spent in one stage of a query or registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Per-stage timings plus the end-to-end total.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

/// Records consecutive stage laps into a [`TimingBreakdown`].
#[derive(Debug)]
pub struct Stopwatch {
    origin: Instant,
    last: Instant,
    timings: TimingBreakdown,
}

impl Stopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last: now,
            timings: TimingBreakdown::default(),
        }
    }

    /// Close the current stage under `label`.
    pub fn lap(&mut self, label: &str) {
        let now = Instant::now();
        self.timings.push(label, millis(now - self.last));
        self.last = now;
    }

    pub fn finish(mut self) -> TimingBreakdown {
        self.timings.total_ms = millis(self.origin.elapsed());
        self.timings
    }
}

fn millis(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
