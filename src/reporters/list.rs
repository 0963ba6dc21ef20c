use colored::Color;

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::reporters::output::{icon, Paint};
use crate::reporters::{Reporter, ResultCollector};

/// One line per finished test.
pub struct ListReporter {
    collector: ResultCollector,
}

impl ListReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector }
    }

    /// `Group.case description`, or the dotted identity when there is no
    /// group to show.
    fn test_line(&self, test: &TestIdentity) -> String {
        let mut line = match test.group() {
            Some(group) => format!("{}.{}", group, test.name()),
            None => test.dotted(),
        };
        if let Some(description) = self.collector.short_description(test) {
            line.push(' ');
            line.push_str(description);
        }
        line
    }
}

impl Reporter for ListReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        self.collector.write("\n")
    }

    fn on_pass(&mut self, test: &TestIdentity) -> Result<()> {
        let line = self.test_line(test);
        self.collector.paint(&format!("  {} ", icon::CHECK), Paint::new(Color::Green))?;
        self.collector.paint(&format!("{}\n", line), Paint::light(Color::Black))
    }

    fn on_skip(&mut self, test: &TestIdentity, reason: &str) -> Result<()> {
        let line = self.test_line(test);
        self.collector
            .paint(&format!("  - {} ({})\n", line, reason), Paint::new(Color::Blue))
    }

    fn on_fail(&mut self, test: &TestIdentity, _error: &ErrorInfo, number: usize) -> Result<()> {
        let line = self.test_line(test);
        self.collector
            .paint(&format!("  {}) {}\n", number, line), Paint::new(Color::Red))
    }

    fn on_error(&mut self, test: &TestIdentity, _error: &ErrorInfo, number: usize) -> Result<()> {
        let line = self.test_line(test);
        self.collector
            .paint(&format!("  {}) {}\n", number, line), Paint::new(Color::Magenta))
    }
}
