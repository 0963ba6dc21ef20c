use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::Result;
use crate::core::stats::{RunStatistics, RunTiming};
use crate::reporters::{JsonField, Reporter, ResultCollector};

/// Run totals as they appear in the `json` document and the `jsstream`
/// `end` event.
#[derive(Debug, Clone, Serialize)]
pub struct StatsDocument {
    pub tests: usize,
    pub passed: usize,
    pub errors: usize,
    pub failures: usize,
    pub skipped: usize,
    pub successful: bool,
    pub start: String,
    pub end: String,
    pub duration: f64,
}

impl StatsDocument {
    pub fn new(stats: &RunStatistics, timing: &RunTiming) -> Self {
        Self {
            tests: stats.tests_run,
            passed: stats.passed,
            errors: stats.errored,
            failures: stats.failed,
            skipped: stats.skipped,
            successful: stats.successful(),
            start: RunTiming::format_timestamp(&timing.start),
            end: RunTiming::format_timestamp(&timing.stop),
            duration: timing.elapsed_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunDocument {
    stats: StatsDocument,
    passes: Vec<Map<String, Value>>,
    failures: Vec<Map<String, Value>>,
    skipped: Vec<Map<String, Value>>,
    errors: Vec<Map<String, Value>>,
}

/// Silent while tests run, then one JSON document.
pub struct JsonReporter {
    collector: ResultCollector,
}

impl JsonReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector }
    }

    fn document(&self, timing: &RunTiming) -> RunDocument {
        let c = &self.collector;

        RunDocument {
            stats: StatsDocument::new(&c.statistics(), timing),
            passes: c
                .successes()
                .iter()
                .map(|test| c.test_to_json(test, Vec::new()))
                .collect(),
            failures: c
                .failures()
                .iter()
                .map(|f| c.test_to_json(&f.test, vec![("error", JsonField::Error(&f.error))]))
                .collect(),
            skipped: c
                .skipped()
                .iter()
                .map(|(test, reason)| {
                    c.test_to_json(test, vec![("reason", JsonField::Value(Value::from(reason.as_str())))])
                })
                .collect(),
            errors: c
                .errors()
                .iter()
                .map(|e| c.test_to_json(&e.test, vec![("error", JsonField::Error(&e.error))]))
                .collect(),
        }
    }
}

impl Reporter for JsonReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_stop(&mut self, timing: &RunTiming) -> Result<()> {
        let json_string = serde_json::to_string(&self.document(timing))?;
        self.collector.write(&format!("{}\n", json_string))
    }
}
