use crate::reporters::{Reporter, ResultCollector};

/// No live output; only the end-of-run summary.
pub struct MinReporter {
    collector: ResultCollector,
}

impl MinReporter {
    pub fn new(collector: ResultCollector) -> Self {
        Self { collector }
    }
}

impl Reporter for MinReporter {
    fn collector(&self) -> &ResultCollector {
        &self.collector
    }

    fn collector_mut(&mut self) -> &mut ResultCollector {
        &mut self.collector
    }
}
