use std::collections::hash_map::Entry;
use std::collections::HashMap;

use colored::Color;

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, TestIdentity};
use crate::reporters::output::{icon, Paint};
use crate::reporters::{Reporter, ResultCollector};

/// Tests nested under their suite and group headings, each heading printed
/// the first time it is seen.
pub struct SpecReporter {
    collector: ResultCollector,
    /// suite -> groups already printed beneath it
    seen: HashMap<String, Vec<String>>,
}

impl SpecReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self {
            collector,
            seen: HashMap::new(),
        }
    }

    fn heading(collector: &mut ResultCollector, indent: usize, name: &str) -> Result<()> {
        collector
            .paint(&format!("{}{}\n", " ".repeat(indent), name), Paint::new(Color::White))
    }
}

impl Reporter for SpecReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        self.seen.clear();
        Ok(())
    }

    fn on_test_start(&mut self, test: &TestIdentity) -> Result<()> {
        match (test.suite(), test.group()) {
            (Some(suite), Some(group)) => {
                let groups = match self.seen.entry(suite.to_string()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        Self::heading(&mut self.collector, 2, suite)?;
                        entry.insert(Vec::new())
                    }
                };
                if !groups.iter().any(|g| g == group) {
                    Self::heading(&mut self.collector, 4, group)?;
                    groups.push(group.to_string());
                }
            }
            (None, Some(group)) => {
                log::debug!("`{}` has no suite, showing its group at the top level", test);
                if let Entry::Vacant(entry) = self.seen.entry(group.to_string()) {
                    Self::heading(&mut self.collector, 2, group)?;
                    entry.insert(Vec::new());
                }
            }
            _ => log::debug!("`{}` has no group to show", test),
        }
        Ok(())
    }

    fn on_pass(&mut self, test: &TestIdentity) -> Result<()> {
        let label = self.collector.description_or_name(test);
        self.collector
            .paint(&format!("      {}", icon::CHECK), Paint::new(Color::Green))?;
        self.collector
            .paint(&format!(" {}\n", label), Paint::light(Color::Black))
    }

    fn on_skip(&mut self, test: &TestIdentity, reason: &str) -> Result<()> {
        let label = self.collector.description_or_name(test);
        self.collector
            .paint(&format!("      - {} ({})\n", label, reason), Paint::new(Color::Blue))
    }

    fn on_fail(&mut self, test: &TestIdentity, _error: &ErrorInfo, number: usize) -> Result<()> {
        let label = self.collector.description_or_name(test);
        self.collector
            .paint(&format!("      {}) {}\n", number, label), Paint::new(Color::Red))
    }

    fn on_error(&mut self, test: &TestIdentity, _error: &ErrorInfo, number: usize) -> Result<()> {
        let label = self.collector.description_or_name(test);
        self.collector
            .paint(&format!("      {}) {}\n", number, label), Paint::new(Color::Magenta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Outcome;
    use crate::reporters::test_helpers::*;

    #[test]
    fn test_headings_print_once() {
        let (collector, sink) = collector(4, false);
        let mut reporter = SpecReporter::new(collector);
        reporter.on_run_start().unwrap();

        run_one(&mut reporter, &id("tests.test_add.Add.test_numbers"), Outcome::Pass);
        run_one(
            &mut reporter,
            &id("tests.test_add.Add.test_strings").with_description("joins strings"),
            Outcome::Skip("no strings".to_string()),
        );
        run_one(
            &mut reporter,
            &id("tests.test_add.Sub.test_numbers"),
            Outcome::Fail(ErrorInfo::new("AssertionError", "1 != 2")),
        );
        run_one(
            &mut reporter,
            &id("tests.test_mult.Multiply.test_numbers"),
            Outcome::Error(ErrorInfo::new("TypeError", "bad")),
        );

        assert_eq!(
            sink.contents(),
            concat!(
                "  test_add\n",
                "    Add\n",
                "      ✓ test_numbers\n",
                "      - joins strings (no strings)\n",
                "    Sub\n",
                "      1) test_numbers\n",
                "  test_mult\n",
                "    Multiply\n",
                "      2) test_numbers\n",
            )
        );
    }

    #[test]
    fn test_short_identities_do_not_fail() {
        let (collector, sink) = collector(2, false);
        let mut reporter = SpecReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("Group.case"), Outcome::Pass);
        run_one(&mut reporter, &id("lonely"), Outcome::Pass);

        assert_eq!(
            sink.contents(),
            concat!("  Group\n", "      ✓ case\n", "      ✓ lonely\n")
        );
    }

    #[test]
    fn test_run_start_resets_seen_headings() {
        let (collector, sink) = collector(1, false);
        let mut reporter = SpecReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("m.G.a"), Outcome::Pass);
        assert_eq!(sink.contents().matches("  m\n").count(), 2);
    }

    #[test]
    fn test_returning_to_a_suite_reuses_its_headings() {
        let (collector, sink) = collector(4, false);
        let mut reporter = SpecReporter::new(collector);
        reporter.on_run_start().unwrap();
        run_one(&mut reporter, &id("t.a.A.one"), Outcome::Pass);
        run_one(&mut reporter, &id("t.b.B.two"), Outcome::Pass);
        run_one(&mut reporter, &id("t.a.A.three"), Outcome::Pass);
        run_one(&mut reporter, &id("t.a.C.four"), Outcome::Pass);

        assert_eq!(
            sink.contents(),
            concat!(
                "  a\n",
                "    A\n",
                "      ✓ one\n",
                "  b\n",
                "    B\n",
                "      ✓ two\n",
                "      ✓ three\n",
                "    C\n",
                "      ✓ four\n",
            )
        );
    }
}
