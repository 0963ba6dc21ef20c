use serde_json::{json, Value};

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::core::stats::RunTiming;
use crate::reporters::json::StatsDocument;
use crate::reporters::{JsonField, Reporter, ResultCollector};

/// Newline-delimited `[event, payload]` arrays.
pub struct JsonStreamReporter {
    collector: ResultCollector,
}

impl JsonStreamReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector }
    }

    fn event(&mut self, tag: &str, payload: Value) -> Result<()> {
        let line = serde_json::to_string(&json!([tag, payload]))?;
        self.collector.write(&format!("{}\n", line))
    }

    fn test_event(&mut self, tag: &str, test: &TestIdentity, fields: Vec<(&str, JsonField<'_>)>) -> Result<()> {
        let payload = Value::Object(self.collector.test_to_json(test, fields));
        self.event(tag, payload)
    }
}

impl Reporter for JsonStreamReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        let total = self.collector.test_count();
        self.event("start", json!({ "total": total }))
    }

    fn on_pass(&mut self, test: &TestIdentity) -> Result<()> {
        self.test_event("pass", test, Vec::new())
    }

    fn on_fail(&mut self, test: &TestIdentity, error: &ErrorInfo, _number: usize) -> Result<()> {
        self.test_event("fail", test, vec![("error", JsonField::Error(error))])
    }

    fn on_error(&mut self, test: &TestIdentity, error: &ErrorInfo, _number: usize) -> Result<()> {
        self.test_event("error", test, vec![("error", JsonField::Error(error))])
    }

    fn on_skip(&mut self, test: &TestIdentity, reason: &str) -> Result<()> {
        self.test_event("skip", test, vec![("reason", JsonField::Value(Value::from(reason)))])
    }

    fn on_run_stop(&mut self, timing: &RunTiming) -> Result<()> {
        let stats = StatsDocument::new(&self.collector.statistics(), timing);
        self.event("end", serde_json::to_value(stats)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::reporters::test_helpers::*;

    #[test]
    fn test_single_passing_test() {
        let (collector, sink) = collector(1, false);
        let mut reporter = JsonStreamReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("tests.Group.case"), Outcome::Pass);
        reporter.on_run_stop(&timing()).unwrap();

        let output = sink.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"["start",{"total":1}]"#);
        assert_eq!(lines[1], r#"["pass",{"test":"tests.Group.case","description":null}]"#);

        let end: Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(end[0], "end");
        assert_eq!(end[1]["passed"], 1);
        assert_eq!(end[1]["tests"], 1);
        assert_eq!(end[1]["successful"], true);
    }

    #[test]
    fn test_failure_events() {
        let (collector, sink) = collector(3, false);
        let mut reporter = JsonStreamReporter::new(collector);
        run_one(
            &mut reporter,
            &id("m.G.a"),
            Outcome::Fail(ErrorInfo::new("AssertionError", "1 != 2")),
        );
        run_one(
            &mut reporter,
            &id("m.G.b"),
            Outcome::Error(ErrorInfo::new("KeyError", "'x'")),
        );
        run_one(&mut reporter, &id("m.G.c"), Outcome::Skip("later".to_string()));

        assert_eq!(
            sink.contents(),
            concat!(
                r#"["fail",{"test":"m.G.a","description":null,"error":"AssertionError: 1 != 2"}]"#,
                "\n",
                r#"["error",{"test":"m.G.b","description":null,"error":"KeyError: 'x'"}]"#,
                "\n",
                r#"["skip",{"test":"m.G.c","description":null,"reason":"later"}]"#,
                "\n",
            )
        );
    }
}
