use std::any::Any;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe, Location};

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, Outcome, TestIdentity};
use crate::core::runner::Executor;
use crate::reporters::Reporter;

type TestBody = Box<dyn Fn() -> Outcome>;

/// A named test whose body reports its own outcome.
pub struct TestCase {
    id: TestIdentity,
    body: TestBody,
    expected_failure: bool,
}

impl TestCase {
    pub fn new(id: TestIdentity, body: impl Fn() -> Outcome + 'static) -> Self {
        Self {
            id,
            body: Box::new(body),
            expected_failure: false,
        }
    }

    /// Mark the test as expected to fail: a failure counts as a pass and a
    /// pass counts as a failure.
    pub fn expected_failure(mut self) -> Self {
        self.expected_failure = true;
        self
    }

    pub fn id(&self) -> &TestIdentity {
        &self.id
    }

    /// Run the body. A panic becomes an `Error` outcome.
    pub fn run(&self) -> Outcome {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(outcome) => outcome,
            Err(payload) => Outcome::Error(ErrorInfo::new("panic", panic_message(payload.as_ref()))),
        };

        if self.expected_failure {
            outcome.expecting_failure()
        } else {
            outcome
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// An ordered list of test cases, run one after another.
#[derive(Default)]
pub struct TestSuite {
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    pub fn with(mut self, case: TestCase) -> Self {
        self.add(case);
        self
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl Executor for TestSuite {
    fn count_test_cases(&self) -> usize {
        self.cases.len()
    }

    fn run(&mut self, reporter: &mut dyn Reporter) -> Result<()> {
        for case in &self.cases {
            if reporter.should_stop() {
                log::debug!("Stop requested, skipping remaining tests from {}", case.id());
                break;
            }

            reporter.start_test(case.id())?;
            let outcome = case.run();
            log::debug!("{} -> {}", case.id(), outcome.label());
            reporter.record(case.id(), outcome)?;
            reporter.stop_test(case.id())?;
        }
        Ok(())
    }
}

/// `Pass` when `left == right`, otherwise a `Fail` whose trace points at
/// the caller.
#[track_caller]
pub fn expect_eq<T: PartialEq + Debug>(left: T, right: T) -> Outcome {
    if left == right {
        return Outcome::Pass;
    }
    let location = Location::caller();
    let error = ErrorInfo::new("AssertionError", format!("{:?} != {:?}", left, right));
    let trace = format!(
        "Assertion trace:\n  at {}:{}:{}\n{}\n",
        location.file(),
        location.line(),
        location.column(),
        error.summary()
    );
    Outcome::Fail(error.with_trace(trace))
}

/// `Pass` when `result` is an error, otherwise a `Fail`.
#[track_caller]
pub fn expect_err<T: Debug, E>(result: std::result::Result<T, E>) -> Outcome {
    match result {
        Err(_) => Outcome::Pass,
        Ok(value) => {
            let location = Location::caller();
            Outcome::Fail(ErrorInfo::new(
                "AssertionError",
                format!("expected an error, got Ok({:?}) at {}:{}", value, location.file(), location.line()),
            ))
        }
    }
}
