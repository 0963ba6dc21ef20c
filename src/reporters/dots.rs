use colored::Color;

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::reporters::output::{icon, Paint};
use crate::reporters::{Reporter, ResultCollector};

/// One dot per test, recolored in place once the outcome is known.
pub struct DotsReporter {
    collector: ResultCollector,
}

impl DotsReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector }
    }

    /// Replace the pending dot with one in the outcome's color. Without
    /// cursor control no pending dot was drawn, so this just appends.
    fn settle(&mut self, paint: Option<Paint>) -> Result<()> {
        let output = self.collector.output_mut();
        output.left(1)?;
        match paint {
            Some(paint) => output.paint(icon::DOT, paint),
            None => output.write(icon::DOT),
        }
    }
}

impl Reporter for DotsReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        self.collector.write("\n  ")
    }

    fn on_test_start(&mut self, _test: &TestIdentity) -> Result<()> {
        if !self.collector.supports_color() {
            return Ok(());
        }
        self.collector.paint(icon::DOT, Paint::light(Color::Black))
    }

    fn on_pass(&mut self, _test: &TestIdentity) -> Result<()> {
        self.settle(None)
    }

    fn on_skip(&mut self, _test: &TestIdentity, _reason: &str) -> Result<()> {
        self.settle(Some(Paint::new(Color::Blue)))
    }

    fn on_fail(&mut self, _test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        self.settle(Some(Paint::new(Color::Red)))
    }

    fn on_error(&mut self, _test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        self.settle(Some(Paint::new(Color::Magenta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::reporters::test_helpers::*;

    #[test]
    fn test_plain_dots() {
        let (collector, sink) = collector(3, false);
        let mut reporter = DotsReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        run_one(&mut reporter, &id("m.G.b"), Outcome::Skip("later".to_string()));
        run_one(&mut reporter, &id("m.G.c"), Outcome::Pass);
        assert_eq!(sink.contents(), "\n  ․․․");
    }

    #[test]
    fn test_colored_dots_overwrite_pending_dot() {
        let (collector, sink) = collector(2, true);
        let mut reporter = DotsReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        run_one(
            &mut reporter,
            &id("m.G.b"),
            Outcome::Fail(ErrorInfo::new("AssertionError", "x")),
        );

        let pending = "\x1b[30;1m․\x1b[0m";
        let expected = format!(
            "\n  {pending}\x1b[1D․{pending}\x1b[1D\x1b[31m․\x1b[0m",
            pending = pending
        );
        assert_eq!(sink.contents(), expected);
    }

    #[test]
    fn test_summary_follows_dots() {
        let (collector, sink) = collector(1, false);
        let mut reporter = DotsReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        reporter.on_run_stop(&timing()).unwrap();
        assert_eq!(sink.contents(), "\n  ․\n\n✔ 1 passing (1.500s)\n\n");
    }
}
