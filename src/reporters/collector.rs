use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::Color;
use serde_json::{Map, Value};

use crate::core::config::RunnerConfig;
use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::core::stats::{RunStatistics, RunTiming};
use crate::core::trace::format_frames;
use crate::reporters::output::{icon, Output, Paint};

/// Indentation of the trace printed under each numbered failure.
const TRACE_INDENT: usize = 5;

/// A failed or errored test, numbered in the order it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub number: usize,
    pub test: TestIdentity,
    pub error: ErrorInfo,
}

/// Extra fields merged into a test's JSON mapping.
#[derive(Debug, Clone)]
pub enum JsonField<'a> {
    /// Collapsed to `"Kind: message"`.
    Error(&'a ErrorInfo),
    Value(Value),
}

/// Bookkeeping shared by every style: outcome lists, counters, the output
/// sink and the default end-of-run summary.
pub struct ResultCollector {
    output: Output,
    descriptions: bool,
    verbosity: u8,
    failfast: bool,
    buffer: bool,
    test_count: usize,

    tests_run: usize,
    failure_counter: usize,
    successes: Vec<TestIdentity>,
    failures: Vec<Failure>,
    errors: Vec<Failure>,
    skipped: Vec<(TestIdentity, String)>,
    expected_failures: Vec<(TestIdentity, ErrorInfo)>,
    unexpected_successes: Vec<TestIdentity>,

    stop_requested: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl ResultCollector {
    pub fn new(output: Output, test_count: usize) -> Self {
        Self {
            output,
            descriptions: true,
            verbosity: 1,
            failfast: false,
            buffer: false,
            test_count,
            tests_run: 0,
            failure_counter: 0,
            successes: Vec::new(),
            failures: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
            expected_failures: Vec::new(),
            unexpected_successes: Vec::new(),
            stop_requested: false,
            interrupted: None,
        }
    }

    pub fn from_config(output: Output, config: &RunnerConfig, test_count: usize) -> Self {
        let mut collector = Self::new(output, test_count);
        collector.descriptions = config.descriptions;
        collector.verbosity = config.verbosity;
        collector.failfast = config.failfast;
        collector.buffer = config.buffer;
        collector
    }

    pub fn with_descriptions(mut self, descriptions: bool) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn with_failfast(mut self, failfast: bool) -> Self {
        self.failfast = failfast;
        self
    }

    /// Share a flag that, once set, makes [`should_stop`](Self::should_stop)
    /// report true.
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    pub fn test_count(&self) -> usize {
        self.test_count
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn buffer(&self) -> bool {
        self.buffer
    }

    pub fn failfast(&self) -> bool {
        self.failfast
    }

    pub fn successes(&self) -> &[TestIdentity] {
        &self.successes
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    pub fn skipped(&self) -> &[(TestIdentity, String)] {
        &self.skipped
    }

    pub fn expected_failures(&self) -> &[(TestIdentity, ErrorInfo)] {
        &self.expected_failures
    }

    pub fn unexpected_successes(&self) -> &[TestIdentity] {
        &self.unexpected_successes
    }

    pub fn supports_color(&self) -> bool {
        self.output.supports_color()
    }

    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.output
    }

    pub fn write(&mut self, text: &str) -> Result<()> {
        self.output.write(text)
    }

    pub fn paint(&mut self, text: &str, paint: Paint) -> Result<()> {
        self.output.paint(text, paint)
    }

    /// The test's short description, unless descriptions are turned off.
    pub fn short_description<'a>(&self, test: &'a TestIdentity) -> Option<&'a str> {
        if self.descriptions {
            test.description()
        } else {
            None
        }
    }

    pub fn description_or_name<'a>(&self, test: &'a TestIdentity) -> &'a str {
        self.short_description(test).unwrap_or_else(|| test.name())
    }

    pub fn start_test(&mut self) {
        self.tests_run += 1;
    }

    pub fn add_success(&mut self, test: &TestIdentity) {
        self.successes.push(test.clone());
    }

    /// Returns the failure's sequence number.
    pub fn add_failure(&mut self, test: &TestIdentity, error: ErrorInfo) -> usize {
        let number = self.next_failure_number();
        self.failures.push(Failure { number, test: test.clone(), error });
        number
    }

    /// Returns the error's sequence number.
    pub fn add_error(&mut self, test: &TestIdentity, error: ErrorInfo) -> usize {
        let number = self.next_failure_number();
        self.errors.push(Failure { number, test: test.clone(), error });
        number
    }

    pub fn add_skip(&mut self, test: &TestIdentity, reason: &str) {
        self.skipped.push((test.clone(), reason.to_string()));
    }

    pub fn add_expected_failure(&mut self, test: &TestIdentity, error: ErrorInfo) {
        self.expected_failures.push((test.clone(), error));
    }

    pub fn add_unexpected_success(&mut self, test: &TestIdentity) {
        self.unexpected_successes.push(test.clone());
    }

    fn next_failure_number(&mut self) -> usize {
        self.failure_counter += 1;
        if self.failfast {
            self.stop();
        }
        self.failure_counter
    }

    /// Ask the executor to stop before the next test.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn should_stop(&self) -> bool {
        self.stop_requested
            || self
                .interrupted
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub fn statistics(&self) -> RunStatistics {
        RunStatistics {
            tests_run: self.tests_run,
            passed: self.successes.len(),
            failed: self.failures.len(),
            errored: self.errors.len(),
            skipped: self.skipped.len(),
            expected_failures: self.expected_failures.len(),
            unexpected_successes: self.unexpected_successes.len(),
            timing: None,
        }
    }

    /// The default end-of-run report: counts, then every failure and error
    /// in sequence order with its trace.
    pub fn write_summary(&mut self, timing: &RunTiming) -> Result<()> {
        self.output.write("\n\n")?;

        if self.is_successful() {
            self.output.paint(&format!("{} ", icon::CHECK_BOLD), Paint::new(Color::Green))?;
        } else {
            self.output.write("  ")?;
        }

        self.output
            .paint(&format!("{} passing ", self.successes.len()), Paint::new(Color::Green))?;
        self.output
            .paint(&format!("({:.3}s)\n", timing.elapsed_secs()), Paint::light(Color::Black))?;

        if !self.skipped.is_empty() {
            self.output
                .paint(&format!("  {} pending\n", self.skipped.len()), Paint::new(Color::Blue))?;
        }
        if !self.errors.is_empty() {
            let count = self.errors.len();
            self.output.paint(
                &format!("{} {} error{}\n", icon::CROSS, count, if count > 1 { "s" } else { "" }),
                Paint::new(Color::Magenta),
            )?;
        }
        if !self.failures.is_empty() {
            self.output.paint(
                &format!("{} {} failing\n", icon::CROSS, self.failures.len()),
                Paint::new(Color::Red),
            )?;
        }

        if !self.is_successful() {
            self.output.write("\n")?;
        }

        let mut listed: Vec<(&Failure, Paint)> = self
            .failures
            .iter()
            .map(|f| (f, Paint::new(Color::Red)))
            .chain(self.errors.iter().map(|e| (e, Paint::new(Color::Magenta))))
            .collect();
        listed.sort_by_key(|(failure, _)| failure.number);

        for (failure, paint) in listed {
            let description = if self.descriptions { failure.test.description() } else { None };
            Self::write_trace(&mut self.output, failure, description, paint)?;
        }

        self.output.write("\n")
    }

    fn write_trace(
        output: &mut Output,
        failure: &Failure,
        description: Option<&str>,
        paint: Paint,
    ) -> Result<()> {
        let test = &failure.test;
        let mut header = match (test.suite(), test.group()) {
            (Some(suite), Some(group)) => format!("{}.{}.{}", suite, group, test.name()),
            _ => {
                log::debug!("`{}` is too short for a suite.group.case header", test);
                test.dotted()
            }
        };
        if let Some(description) = description {
            header.push(' ');
            header.push_str(description);
        }
        output.paint(&format!("  {}) {}\n", failure.number, header), Paint::new(Color::White))?;

        let pad = " ".repeat(TRACE_INDENT);
        let assertion: String = failure
            .error
            .summary()
            .lines()
            .map(|line| format!("{}{}\n", pad, line))
            .collect();
        output.paint(&assertion, paint)?;

        let body = format_frames(failure.error.frames(), TRACE_INDENT);
        output.write(&format!("{}\n", body))
    }

    /// `{"test": <dotted id>, "description": <description or null>}` merged
    /// with `fields`.
    pub fn test_to_json(&self, test: &TestIdentity, fields: Vec<(&str, JsonField<'_>)>) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("test".to_string(), Value::String(test.dotted()));
        object.insert(
            "description".to_string(),
            self.short_description(test)
                .map_or(Value::Null, |d| Value::String(d.to_string())),
        );

        for (key, field) in fields {
            let value = match field {
                JsonField::Error(error) => Value::String(error.summary()),
                JsonField::Value(value) => value,
            };
            object.insert(key.to_string(), value);
        }

        object
    }

    pub fn test_to_json_string(&self, test: &TestIdentity, fields: Vec<(&str, JsonField<'_>)>) -> Result<String> {
        Ok(serde_json::to_string(&self.test_to_json(test, fields))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::output::MemorySink;
    use chrono::{TimeZone, Utc};
    use indoc::indoc;

    fn collector() -> (ResultCollector, MemorySink) {
        let sink = MemorySink::new();
        let output = Output::new(Box::new(sink.clone()), false);
        (ResultCollector::new(output, 4), sink)
    }

    fn id(dotted: &str) -> TestIdentity {
        TestIdentity::parse(dotted).unwrap()
    }

    fn timing() -> RunTiming {
        let start = Utc.with_ymd_and_hms(2024, 2, 5, 13, 4, 5).unwrap();
        RunTiming::new(start, start + chrono::Duration::milliseconds(250))
    }

    #[test]
    fn test_failure_numbers_are_shared_and_sequential() {
        let (mut c, _) = collector();
        let err = ErrorInfo::new("AssertionError", "nope");
        assert_eq!(c.add_failure(&id("m.G.a"), err.clone()), 1);
        c.add_skip(&id("m.G.b"), "later");
        c.add_success(&id("m.G.c"));
        assert_eq!(c.add_error(&id("m.G.d"), err.clone()), 2);
        assert_eq!(c.add_failure(&id("m.G.e"), err), 3);
    }

    #[test]
    fn test_statistics() {
        let (mut c, _) = collector();
        for _ in 0..3 {
            c.start_test();
        }
        c.add_success(&id("m.G.a"));
        c.add_skip(&id("m.G.b"), "later");
        c.add_error(&id("m.G.c"), ErrorInfo::new("TypeError", "bad"));

        let stats = c.statistics();
        assert_eq!(stats.tests_run, 3);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.errored, 1);
        assert_eq!(stats.recorded(), stats.tests_run);
        assert!(!stats.successful());
    }

    #[test]
    fn test_failfast_requests_stop() {
        let (c, _) = collector();
        let mut c = c.with_failfast(true);
        assert!(!c.should_stop());
        c.add_success(&id("m.G.a"));
        assert!(!c.should_stop());
        c.add_failure(&id("m.G.b"), ErrorInfo::new("AssertionError", "x"));
        assert!(c.should_stop());
    }

    #[test]
    fn test_interrupt_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let (c, _) = collector();
        let c = c.with_interrupt_flag(flag.clone());
        assert!(!c.should_stop());
        flag.store(true, Ordering::SeqCst);
        assert!(c.should_stop());
    }

    #[test]
    fn test_summary_all_passing() {
        let (mut c, sink) = collector();
        c.add_success(&id("m.G.a"));
        c.add_success(&id("m.G.b"));
        c.write_summary(&timing()).unwrap();
        assert_eq!(sink.contents(), "\n\n✔ 2 passing (0.250s)\n\n");
    }

    #[test]
    fn test_summary_with_failures() {
        let (mut c, sink) = collector();
        c.add_success(&id("tests.math.Add.test_ok"));
        c.add_skip(&id("tests.math.Add.test_skip"), "later");
        c.add_error(
            &id("tests.math.Add.test_raises"),
            ErrorInfo::new("TypeError", "bad operand")
                .with_trace("Traceback (most recent call last):\n  File \"math.py\", line 3\nTypeError: bad operand\n"),
        );
        c.add_failure(
            &id("tests.math.Add.test_fails").with_description("adds badly"),
            ErrorInfo::new("AssertionError", "4 != 5"),
        );
        c.write_summary(&timing()).unwrap();

        let expected = indoc! {"


              1 passing (0.250s)
              1 pending
            ✖ 1 error
            ✖ 1 failing

              1) math.Add.test_raises
                 TypeError: bad operand
                   File \"math.py\", line 3
              2) math.Add.test_fails adds badly
                 AssertionError: 4 != 5


        "};
        assert_eq!(sink.contents(), expected);
    }

    #[test]
    fn test_summary_short_identity_falls_back_to_dotted() {
        let (mut c, sink) = collector();
        c.add_failure(&id("Group.case"), ErrorInfo::new("AssertionError", "x"));
        c.write_summary(&timing()).unwrap();
        assert!(sink.contents().contains("  1) Group.case\n     AssertionError: x\n"));
    }

    #[test]
    fn test_summary_keeps_multi_line_message() {
        let (mut c, sink) = collector();
        c.add_error(
            &id("m.G.eq"),
            ErrorInfo::new("panic", "assertion `left == right` failed\n  left: 1\n right: 2"),
        );
        c.write_summary(&timing()).unwrap();

        let expected = concat!(
            "  1) m.G.eq\n",
            "     panic: assertion `left == right` failed\n",
            "       left: 1\n",
            "      right: 2\n",
            "\n",
            "\n",
        );
        assert!(sink.contents().ends_with(expected), "{}", sink.contents());
    }

    #[test]
    fn test_summary_in_color() {
        let sink = MemorySink::new();
        let mut c = ResultCollector::new(Output::new(Box::new(sink.clone()), true), 1);
        c.add_success(&id("m.G.a"));
        c.write_summary(&timing()).unwrap();
        assert_eq!(
            sink.contents(),
            "\n\n\x1b[32m✔ \x1b[0m\x1b[32m1 passing \x1b[0m\x1b[30;1m(0.250s)\n\x1b[0m\n"
        );
    }

    #[test]
    fn test_to_json() {
        let (c, _) = collector();
        let test = id("m.G.case").with_description("does things");
        let err = ErrorInfo::new("AssertionError", "1 != 2");

        let object = c.test_to_json(&test, vec![("error", JsonField::Error(&err))]);
        assert_eq!(
            Value::Object(object),
            serde_json::json!({"test": "m.G.case", "description": "does things", "error": "AssertionError: 1 != 2"})
        );

        let text = c
            .test_to_json_string(&id("m.G.other"), vec![("reason", JsonField::Value(Value::from("later")))])
            .unwrap();
        assert_eq!(text, r#"{"test":"m.G.other","description":null,"reason":"later"}"#);
    }

    #[test]
    fn test_descriptions_disabled() {
        let (c, _) = collector();
        let c = c.with_descriptions(false);
        let test = id("m.G.case").with_description("hidden");
        assert_eq!(c.short_description(&test), None);
        assert_eq!(c.description_or_name(&test), "case");
    }
}
