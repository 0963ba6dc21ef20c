use std::io::{self, IsTerminal, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::core::config::RunnerConfig;
use crate::core::error::{Result, UnitStyleError};
use crate::core::stats::{RunStatistics, RunTiming};
use crate::reporters::{build_reporter, Output, Reporter, ResultCollector};

/// The thing that actually runs tests, reporting each one to the
/// [`Reporter`] it is handed.
pub trait Executor {
    /// Number of tests the run will contain, known before it starts.
    fn count_test_cases(&self) -> usize;

    /// Run every test, calling `start_test`, one `record_*` and `stop_test`
    /// per test. Implementations should check `reporter.should_stop()`
    /// between tests.
    fn run(&mut self, reporter: &mut dyn Reporter) -> Result<()>;
}

/// Exit status used when a second interrupt abandons the run.
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Set the interrupt flag. Returns true if it was already set.
fn note_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

/// Selects a reporter from the configured format and drives one run.
pub struct TestRunner {
    config: RunnerConfig,
    writer: Box<dyn Write>,
    color: bool,
    interrupted: Arc<AtomicBool>,
}

impl TestRunner {
    /// A runner writing to stderr, with color decided by the config and
    /// whether stderr is a terminal.
    pub fn new(config: RunnerConfig) -> Self {
        let color = config.color.resolve(io::stderr().is_terminal());
        Self {
            config,
            writer: Box::new(io::stderr()),
            color,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_output(mut self, writer: Box<dyn Write>, color: bool) -> Self {
        self.writer = writer;
        self.color = color;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The flag an interrupt sets; executors see it through
    /// `Reporter::should_stop`.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupted.clone()
    }

    /// Route Ctrl-C to the interrupt flag so the run stops after the
    /// current test and still prints its summary. A second Ctrl-C exits
    /// immediately with status 130, for test bodies that never return.
    pub fn install_interrupt_handler(&self) -> Result<()> {
        let interrupted = self.interrupted.clone();

        ctrlc::set_handler(move || {
            if note_interrupt(&interrupted) {
                log::warn!("Received second interrupt signal, exiting");
                process::exit(INTERRUPT_EXIT_CODE);
            }
            log::warn!("Received interrupt signal, stopping after the current test (press Ctrl-C again to exit)");
        })
        .map_err(|e| UnitStyleError::ExecutionError(format!("Failed to set Ctrl-C handler: {}", e)))?;

        Ok(())
    }

    /// Run `executor` to completion and return the final statistics.
    ///
    /// The stop time is taken as soon as the executor returns, whether or not
    /// it succeeded, and the reporter's end-of-run output is written either
    /// way. An executor error is returned after that.
    pub fn run(self, executor: &mut dyn Executor) -> Result<RunStatistics> {
        let test_count = executor.count_test_cases();
        let format = self.config.format;

        let output = Output::new(self.writer, self.color);
        let collector = ResultCollector::from_config(output, &self.config, test_count)
            .with_interrupt_flag(self.interrupted.clone());
        let mut reporter = build_reporter(format, collector);

        log::debug!("Starting {} tests with the {} reporter", test_count, format);
        reporter.on_run_start()?;

        let start = Utc::now();
        let executed = executor.run(reporter.as_mut());
        let stop = Utc::now();
        let timing = RunTiming::new(start, stop);

        if let Err(e) = &executed {
            log::warn!(
                "Executor aborted after {}: {}",
                humantime::format_duration(timing.elapsed()),
                e
            );
        }
        if self.interrupted.load(Ordering::SeqCst) {
            log::warn!("Run interrupted, reporting partial results");
        }

        reporter.on_run_stop(&timing)?;
        executed?;

        let mut stats = reporter.statistics();
        stats.timing = Some(timing);
        log::debug!(
            "Finished {} tests in {}",
            stats.tests_run,
            humantime::format_duration(timing.elapsed())
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OutputFormat;
    use crate::core::outcome::{ErrorInfo, Outcome, TestIdentity};
    use crate::reporters::MemorySink;

    struct Scripted {
        outcomes: Vec<(&'static str, Outcome)>,
        fail_after: Option<usize>,
    }

    impl Executor for Scripted {
        fn count_test_cases(&self) -> usize {
            self.outcomes.len()
        }

        fn run(&mut self, reporter: &mut dyn Reporter) -> Result<()> {
            for (i, (name, outcome)) in self.outcomes.iter().enumerate() {
                if self.fail_after == Some(i) {
                    return Err(UnitStyleError::ExecutionError("executor crashed".to_string()));
                }
                let test = TestIdentity::parse(name)?;
                reporter.start_test(&test)?;
                reporter.record(&test, outcome.clone())?;
                reporter.stop_test(&test)?;
            }
            Ok(())
        }
    }

    fn runner(format: &str, sink: &MemorySink) -> TestRunner {
        TestRunner::new(RunnerConfig::default().with_format(format))
            .with_output(Box::new(sink.clone()), false)
    }

    #[test]
    fn test_tap_run() {
        let sink = MemorySink::new();
        let mut executor = Scripted {
            outcomes: vec![
                ("tests.GroupA.caseOne", Outcome::Pass),
                ("tests.GroupA.caseTwo", Outcome::Pass),
                ("tests.GroupB.caseThree", Outcome::Skip("disabled".to_string())),
            ],
            fail_after: None,
        };

        let stats = runner("TAP", &sink).run(&mut executor).unwrap();
        assert_eq!(
            sink.contents(),
            "1..3\nok 1 - GroupA caseOne\nok 2 - GroupA caseTwo\nok 3 - GroupB caseThree # SKIP disabled\n"
        );
        assert_eq!(stats.tests_run, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.skipped, 1);
        assert!(stats.successful());
        assert!(stats.timing.is_some());
    }

    #[test]
    fn test_unknown_format_uses_dots() {
        let sink = MemorySink::new();
        let mut executor = Scripted {
            outcomes: vec![("m.G.a", Outcome::Pass)],
            fail_after: None,
        };
        runner("sparkles", &sink).run(&mut executor).unwrap();
        assert!(sink.contents().starts_with("\n  ․\n\n✔ 1 passing ("));
    }

    #[test]
    fn test_executor_failure_still_reports() {
        let sink = MemorySink::new();
        let mut executor = Scripted {
            outcomes: vec![
                ("m.G.a", Outcome::Fail(ErrorInfo::new("AssertionError", "x"))),
                ("m.G.b", Outcome::Pass),
            ],
            fail_after: Some(1),
        };

        let result = runner("min", &sink).run(&mut executor);
        assert!(matches!(result, Err(UnitStyleError::ExecutionError(_))));
        assert!(sink.contents().contains("✖ 1 failing"));
    }

    #[test]
    fn test_interrupted_run_reports_partial_stats() {
        let sink = MemorySink::new();
        let runner = runner("json", &sink);
        runner.interrupt_flag().store(true, Ordering::SeqCst);

        let mut suite = crate::core::suite::TestSuite::new()
            .with(crate::core::suite::TestCase::new(TestIdentity::parse("m.G.a").unwrap(), || Outcome::Pass));
        let stats = runner.run(&mut suite).unwrap();

        assert_eq!(stats.tests_run, 0);
        assert!(sink.contents().starts_with(r#"{"stats":{"tests":0,"#));
    }

    #[test]
    fn test_second_interrupt_abandons_run() {
        let runner = runner("min", &MemorySink::new());
        let flag = runner.interrupt_flag();

        assert!(!note_interrupt(&flag));
        assert!(flag.load(Ordering::SeqCst));
        assert!(note_interrupt(&flag));
    }

    #[test]
    fn test_format_is_read_from_config() {
        let sink = MemorySink::new();
        let mut config = RunnerConfig::default();
        config.format = OutputFormat::JsonStream;
        let mut executor = Scripted { outcomes: vec![], fail_after: None };

        TestRunner::new(config)
            .with_output(Box::new(sink.clone()), true)
            .run(&mut executor)
            .unwrap();
        assert!(sink.contents().starts_with(r#"["start",{"total":0}]"#));
    }
}
