use chrono::{DateTime, Utc};
use std::time::Duration;

/// Wall-clock bounds of a run, captured by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTiming {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl RunTiming {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Self {
        Self { start, stop }
    }

    pub fn elapsed(&self) -> Duration {
        (self.stop - self.start).to_std().unwrap_or_default()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// `Mon, 05 Feb 2024 13:04:05 +0000`
    pub fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
    }
}

/// Aggregate counters for one run.
///
/// Expected failures are already included in `passed`; unexpected successes
/// are already included in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub tests_run: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub expected_failures: usize,
    pub unexpected_successes: usize,
    pub timing: Option<RunTiming>,
}

impl RunStatistics {
    pub fn successful(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    pub fn recorded(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }
}
