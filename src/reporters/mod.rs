pub mod collector;
pub mod output;

pub mod dots;
pub mod json;
pub mod json_stream;
pub mod list;
pub mod min;
pub mod progress;
pub mod spec;
pub mod tap;

use crate::core::config::OutputFormat;
use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, Outcome, TestIdentity};
use crate::core::stats::{RunStatistics, RunTiming};

pub use collector::{Failure, JsonField, ResultCollector};
pub use output::{MemorySink, Output, Paint};

/// A stateful consumer of test lifecycle events.
///
/// Styles implement the `on_*` hooks; executors drive the provided
/// `start_test`/`stop_test`/`record_*` methods, which update the shared
/// [`ResultCollector`] before calling the matching hook.
pub trait Reporter {
    fn collector(&self) -> &ResultCollector;

    fn collector_mut(&mut self) -> &mut ResultCollector;

    fn on_run_start(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_test_start(&mut self, _test: &TestIdentity) -> Result<()> {
        Ok(())
    }

    fn on_test_stop(&mut self, _test: &TestIdentity) -> Result<()> {
        Ok(())
    }

    fn on_pass(&mut self, _test: &TestIdentity) -> Result<()> {
        Ok(())
    }

    fn on_fail(&mut self, _test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        Ok(())
    }

    fn on_error(&mut self, _test: &TestIdentity, _error: &ErrorInfo, _number: usize) -> Result<()> {
        Ok(())
    }

    fn on_skip(&mut self, _test: &TestIdentity, _reason: &str) -> Result<()> {
        Ok(())
    }

    fn on_run_stop(&mut self, timing: &RunTiming) -> Result<()> {
        self.collector_mut().write_summary(timing)
    }

    fn start_test(&mut self, test: &TestIdentity) -> Result<()> {
        self.collector_mut().start_test();
        self.on_test_start(test)
    }

    fn stop_test(&mut self, test: &TestIdentity) -> Result<()> {
        self.on_test_stop(test)
    }

    fn record_pass(&mut self, test: &TestIdentity) -> Result<()> {
        self.collector_mut().add_success(test);
        self.on_pass(test)
    }

    fn record_fail(&mut self, test: &TestIdentity, error: ErrorInfo) -> Result<()> {
        let number = self.collector_mut().add_failure(test, error.clone());
        self.on_fail(test, &error, number)
    }

    fn record_error(&mut self, test: &TestIdentity, error: ErrorInfo) -> Result<()> {
        let number = self.collector_mut().add_error(test, error.clone());
        self.on_error(test, &error, number)
    }

    fn record_skip(&mut self, test: &TestIdentity, reason: &str) -> Result<()> {
        self.collector_mut().add_skip(test, reason);
        self.on_skip(test, reason)
    }

    /// Counted and displayed as a pass.
    fn record_expected_failure(&mut self, test: &TestIdentity, error: ErrorInfo) -> Result<()> {
        self.collector_mut().add_expected_failure(test, error);
        self.record_pass(test)
    }

    /// Counted and displayed as a failure with a synthetic error.
    fn record_unexpected_success(&mut self, test: &TestIdentity) -> Result<()> {
        self.collector_mut().add_unexpected_success(test);
        self.record_fail(test, ErrorInfo::unexpected_success())
    }

    fn record(&mut self, test: &TestIdentity, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Pass => self.record_pass(test),
            Outcome::Fail(error) => self.record_fail(test, error),
            Outcome::Error(error) => self.record_error(test, error),
            Outcome::Skip(reason) => self.record_skip(test, &reason),
            Outcome::ExpectedFailure(error) => self.record_expected_failure(test, error),
            Outcome::UnexpectedSuccess => self.record_unexpected_success(test),
        }
    }

    fn should_stop(&self) -> bool {
        self.collector().should_stop()
    }

    fn statistics(&self) -> RunStatistics {
        self.collector().statistics()
    }
}

/// Build the reporter for `format` around `collector`.
pub fn build_reporter(format: OutputFormat, collector: ResultCollector) -> Box<dyn Reporter> {
    match format {
        OutputFormat::List => Box::new(list::ListReporter::new(collector)),
        OutputFormat::Dots => Box::new(dots::DotsReporter::new(collector)),
        OutputFormat::JsonStream => Box::new(json_stream::JsonStreamReporter::new(collector)),
        OutputFormat::Json => Box::new(json::JsonReporter::new(collector)),
        OutputFormat::Progress => Box::new(progress::ProgressReporter::new(collector)),
        OutputFormat::Min => Box::new(min::MinReporter::new(collector)),
        OutputFormat::Tap => Box::new(tap::TapReporter::new(collector)),
        OutputFormat::Spec => Box::new(spec::SpecReporter::new(collector)),
    }
}
