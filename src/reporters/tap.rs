use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::core::stats::RunTiming;
use crate::reporters::{Reporter, ResultCollector};

/// Test Anything Protocol: a `1..N` plan followed by one `ok`/`not ok` line
/// per test. There is no trailer.
pub struct TapReporter {
    collector: ResultCollector,
    counter: usize,
}

impl TapReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector, counter: 1 }
    }

    fn subject(&self, test: &TestIdentity) -> String {
        match test.group() {
            Some(group) => format!("{} {}", group, self.collector.description_or_name(test)),
            None => match self.collector.short_description(test) {
                Some(description) => format!("{} {}", test.dotted(), description),
                None => test.dotted(),
            },
        }
    }

    fn status_line(&mut self, status: &str, test: &TestIdentity, directive: Option<String>) -> Result<()> {
        let mut line = format!("{} {} - {}", status, self.counter, self.subject(test));
        if let Some(directive) = directive {
            line.push_str(" # ");
            line.push_str(&directive);
        }
        line.push('\n');
        self.collector.write(&line)
    }
}

impl Reporter for TapReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        self.counter = 1;
        let plan = format!("1..{}\n", self.collector.test_count());
        self.collector.write(&plan)
    }

    fn on_test_stop(&mut self, _test: &TestIdentity) -> Result<()> {
        self.counter += 1;
        Ok(())
    }

    fn on_pass(&mut self, test: &TestIdentity) -> Result<()> {
        self.status_line("ok", test, None)
    }

    fn on_skip(&mut self, test: &TestIdentity, reason: &str) -> Result<()> {
        self.status_line("ok", test, Some(format!("SKIP {}", reason)))
    }

    fn on_fail(&mut self, test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        self.status_line("not ok", test, None)
    }

    fn on_error(&mut self, test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        self.status_line("not ok", test, None)
    }

    fn on_run_stop(&mut self, _timing: &RunTiming) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::reporters::test_helpers::*;

    #[test]
    fn test_two_passes_and_a_skip() {
        let (collector, sink) = collector(3, true);
        let mut reporter = TapReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("tests.GroupA.caseOne"), Outcome::Pass);
        run_one(&mut reporter, &id("tests.GroupA.caseTwo"), Outcome::Pass);
        run_one(
            &mut reporter,
            &id("tests.GroupB.caseThree"),
            Outcome::Skip("disabled".to_string()),
        );
        reporter.on_run_stop(&timing()).unwrap();

        assert_eq!(
            sink.contents(),
            "1..3\nok 1 - GroupA caseOne\nok 2 - GroupA caseTwo\nok 3 - GroupB caseThree # SKIP disabled\n"
        );
    }

    #[test]
    fn test_failures_and_descriptions() {
        let (collector, sink) = collector(3, false);
        let mut reporter = TapReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(
            &mut reporter,
            &id("m.Math.test_add").with_description("adds"),
            Outcome::Fail(ErrorInfo::new("AssertionError", "x")),
        );
        run_one(
            &mut reporter,
            &id("m.Math.test_div"),
            Outcome::Error(ErrorInfo::new("ZeroDivisionError", "division by zero")),
        );
        run_one(&mut reporter, &id("orphan"), Outcome::UnexpectedSuccess);

        assert_eq!(
            sink.contents(),
            "1..3\nnot ok 1 - Math adds\nnot ok 2 - Math test_div\nnot ok 3 - orphan\n"
        );
    }

    #[test]
    fn test_run_start_restarts_numbering() {
        let (collector, sink) = collector(2, false);
        let mut reporter = TapReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        run_one(&mut reporter, &id("m.G.b"), Outcome::Pass);

        sink.clear();
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        assert_eq!(sink.contents(), "1..2\nok 1 - G a\n");
    }
}
