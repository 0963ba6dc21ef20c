//! Demonstration suites for trying out the reporters.

use std::thread;
use std::time::Duration;

use crate::core::error::Result;
use crate::core::outcome::{ErrorInfo, Outcome, TestIdentity};
use crate::core::suite::{expect_eq, expect_err, TestCase, TestSuite};

mod code {
    pub fn add(a: i64, b: i64) -> i64 {
        a + b
    }

    pub fn concat(a: &str, b: &str) -> String {
        format!("{}{}", a, b)
    }

    pub fn cube(x: f64) -> f64 {
        x * x * x
    }

    pub fn multiply(a: i64, b: i64) -> i64 {
        a * b
    }

    pub fn repeat(s: &str, n: i64) -> Result<String, String> {
        usize::try_from(n)
            .map(|n| s.repeat(n))
            .map_err(|_| format!("can't repeat {} times", n))
    }

    pub fn parse_number(s: &str) -> Result<f64, std::num::ParseFloatError> {
        s.parse()
    }
}

fn case(path: &str, body: impl Fn() -> Outcome + 'static) -> Result<TestCase> {
    Ok(TestCase::new(TestIdentity::parse(path)?, body))
}

fn described(path: &str, description: &str, body: impl Fn() -> Outcome + 'static) -> Result<TestCase> {
    Ok(TestCase::new(TestIdentity::parse(path)?.with_description(description), body))
}

fn all(outcomes: impl IntoIterator<Item = Outcome>) -> Outcome {
    outcomes
        .into_iter()
        .find(|o| *o != Outcome::Pass)
        .unwrap_or(Outcome::Pass)
}

fn close_to(actual: f64, expected: f64) -> Outcome {
    if (actual - expected).abs() < 1e-7 {
        Outcome::Pass
    } else {
        Outcome::Fail(ErrorInfo::new(
            "AssertionError",
            format!("{} != {} within 7 places", actual, expected),
        ))
    }
}

/// Arithmetic tests that all pass.
pub fn simple() -> Result<TestSuite> {
    let mut suite = TestSuite::new();

    suite.add(case("tests.test_add.Add.test_add_numbers", || {
        all([
            expect_eq(code::add(2, 3), 5),
            expect_eq(code::add(0, 0), 0),
            expect_eq(code::add(-5, 5), 0),
            expect_eq(code::add(-10, 4), -6),
        ])
    })?);
    suite.add(case("tests.test_add.Add.test_add_strings", || {
        expect_eq(code::concat("foo", "bar").as_str(), "foobar")
    })?);
    suite.add(case("tests.test_add.Add.test_rejects_bad_numbers", || {
        expect_err(code::parse_number("foo"))
    })?);

    suite.add(case("tests.test_cube.Cube.test_cubes_numbers", || {
        all([
            expect_eq(code::cube(2.0), 8.0),
            expect_eq(code::cube(3.0), 27.0),
            expect_eq(code::cube(0.0), 0.0),
            expect_eq(code::cube(-5.0), -125.0),
            close_to(code::cube(4.4), 85.184),
        ])
    })?);

    suite.add(case("tests.test_mult.Multiply.test_mult_numbers", || {
        all([
            expect_eq(code::multiply(2, 3), 6),
            expect_eq(code::multiply(0, 0), 0),
            expect_eq(code::multiply(-1, 5), -5),
        ])
    })?);
    suite.add(case("tests.test_mult.Multiply.test_duplicates_strings", || {
        match code::repeat("foo", 3) {
            Ok(s) => expect_eq(s.as_str(), "foofoofoo"),
            Err(e) => Outcome::Error(ErrorInfo::new("ValueError", e)),
        }
    })?);
    suite.add(case("tests.test_mult.Multiply.test_rejects_negative_repeat", || {
        expect_err(code::repeat("foo", -1))
    })?);

    Ok(suite)
}

/// Every kind of outcome: passes, failures, errors, skips, expected
/// failures and unexpected successes.
pub fn kitchen_sink() -> Result<TestSuite> {
    let mut suite = TestSuite::new();

    // Everything here counts as passing.
    suite.add(case("tests.test_results.GoesAsPlanned.test_should_pass", || expect_eq(5, 5))?);
    suite.add(case("tests.test_results.GoesAsPlanned.test_expected_failure", || expect_eq(4, 5))?.expected_failure());
    suite.add(
        case("tests.test_results.GoesAsPlanned.test_expected_failure_direct_call", || {
            Outcome::Fail(ErrorInfo::new("AssertionError", "I planned to do that"))
        })?
        .expected_failure(),
    );
    suite.add(case("tests.test_results.GoesAsPlanned.test_raises", || {
        expect_err(code::parse_number("not a number"))
    })?);
    suite.add(described(
        "tests.test_results.GoesAsPlanned.test_slow_test",
        "takes half a second",
        || {
            thread::sleep(Duration::from_millis(500));
            Outcome::Pass
        },
    )?);

    // Everything here is some kind of failure.
    suite.add(case("tests.test_results.UnplannedFailures.test_fails", || expect_eq(4, 5))?);
    suite.add(case("tests.test_results.UnplannedFailures.test_fails_directly", || {
        Outcome::Fail(ErrorInfo::new("AssertionError", "Manual func call to fail()"))
    })?);
    suite.add(case("tests.test_results.UnplannedFailures.test_raises", || {
        Outcome::Error(
            ErrorInfo::new("TypeError", "unsupported operand").with_trace(
                "Traceback (most recent call last):\n  in test_raises\n    raise TypeError\nTypeError: unsupported operand\n",
            ),
        )
    })?);
    suite.add(case("tests.test_results.UnplannedFailures.test_expected_failure", || expect_eq(2, 2))?.expected_failure());
    suite.add(case("tests.test_results.UnplannedFailures.test_expected_raise_and_passes", || {
        expect_err(code::parse_number("42"))
    })?);
    suite.add(described(
        "tests.test_results.UnplannedFailures.test_panics",
        "panics instead of failing",
        || panic!("index out of bounds: the len is 3 but the index is 7"),
    )?);

    // Everything here is skipped.
    for name in [
        "test_skipped_via_decorator",
        "test_skipped_via_skipif",
        "test_skipped_via_skipunless",
        "test_skipped_via_exception",
    ] {
        suite.add(case(&format!("tests.test_results.VariousSkips.{}", name), || {
            Outcome::Skip("reason for skipping".to_string())
        })?);
    }

    suite.add(case("tests.test_math.Math.test_division", || {
        close_to(1.0 / 3.0, 0.333_333_3)
    })?);

    Ok(suite)
}
