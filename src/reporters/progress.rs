use crate::core::error::Result;
use crate::core::outcome::TestIdentity;
use crate::reporters::output::icon;
use crate::reporters::{Reporter, ResultCollector};

/// Target bar width in segments.
const BAR_SEGMENTS: usize = 50;

/// Geometry of the progress bar for a given suite size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressLayout {
    /// Segments in the bar.
    pub width: usize,
    /// Tests per drawn segment. Only meaningful when `width < total`.
    pub interval: usize,
    total: usize,
}

impl ProgressLayout {
    /// Small suites get a bar stretched to a whole multiple of the test
    /// count; large ones are sampled down to roughly fifty segments.
    pub fn for_total(total: usize) -> Self {
        if total == 0 {
            return Self { width: 0, interval: 1, total };
        }

        if total < BAR_SEGMENTS {
            let per_test = (BAR_SEGMENTS as f64 / total as f64).round_ties_even() as usize;
            Self {
                width: per_test.max(1) * total,
                interval: 1,
                total,
            }
        } else {
            let step = (total as f64 / BAR_SEGMENTS as f64).round_ties_even() as usize;
            let width = total / step.max(1);
            Self {
                width,
                interval: total / width,
                total,
            }
        }
    }

    /// Segments drawn after every single test, if the bar is at least as
    /// wide as the suite.
    fn per_test(&self) -> Option<usize> {
        if self.total > 0 && self.width >= self.total {
            Some(self.width / self.total)
        } else {
            None
        }
    }
}

/// An empty bar drawn up front and filled in as tests finish.
pub struct ProgressReporter {
    collector: ResultCollector,
    layout: ProgressLayout,
    /// Position within the current interval, starting at 1.
    tick: usize,
}

impl ProgressReporter {
    pub fn new(collector: ResultCollector) -> Self {
        let layout = ProgressLayout::for_total(collector.test_count());
        Self { collector, layout, tick: 1 }
    }

    pub fn layout(&self) -> ProgressLayout {
        self.layout
    }

    fn segments_for_next_test(&mut self) -> usize {
        if let Some(n) = self.layout.per_test() {
            return n;
        }
        if self.tick >= self.layout.interval {
            self.tick = 1;
            1
        } else {
            self.tick += 1;
            0
        }
    }
}

impl Reporter for ProgressReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }

    fn on_run_start(&mut self) -> Result<()> {
        self.layout = ProgressLayout::for_total(self.collector.test_count());
        self.tick = 1;

        let bar = format!("  [{}]\n\n", icon::DOT.repeat(self.layout.width));
        self.collector.write(&bar)?;
        let output = self.collector.output_mut();
        output.up(2)?;
        output.right(3)
    }

    fn on_test_stop(&mut self, _test: &TestIdentity) -> Result<()> {
        let n = self.segments_for_next_test();
        if n == 0 {
            return Ok(());
        }
        self.collector.write(&icon::DASH.repeat(n))
    }
}
