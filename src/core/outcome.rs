use std::fmt;

use crate::core::error::{Result, UnitStyleError};

/// The dotted path that identifies one test for the lifetime of a run,
/// e.g. `tests.test_add.Add.test_add_numbers`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestIdentity {
    segments: Vec<String>,
    description: Option<String>,
}

impl TestIdentity {
    /// Build an identity from its path segments.
    ///
    /// An empty path, or a path with an empty segment, is rejected: there is
    /// nothing a renderer could show for it.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(UnitStyleError::MalformedEvent("test identity has no segments".to_string()));
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(UnitStyleError::MalformedEvent(format!(
                "test identity `{}` has an empty segment at position {}",
                segments.join("."),
                pos
            )));
        }

        Ok(Self { segments, description: None })
    }

    /// Parse a dotted identity such as `module.Group.case`.
    pub fn parse(dotted: &str) -> Result<Self> {
        Self::new(dotted.split('.'))
    }

    /// Attach a short description. Only the first non-blank line is kept.
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = description
            .as_ref()
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string);
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// The case name: the last segment.
    pub fn name(&self) -> &str {
        // `new` guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The grouping key: the second-to-last segment, if any.
    pub fn group(&self) -> Option<&str> {
        self.from_end(2)
    }

    /// The segment above the group (usually the module), if any.
    pub fn suite(&self) -> Option<&str> {
        self.from_end(3)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn from_end(&self, n: usize) -> Option<&str> {
        self.segments
            .len()
            .checked_sub(n)
            .map(|idx| self.segments[idx].as_str())
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A structured failure record: what went wrong, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
    pub trace: Option<String>,
}

impl ErrorInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// The synthetic error recorded when a test marked as an expected
    /// failure passes.
    pub fn unexpected_success() -> Self {
        Self::new("ExpectedFailure", "Test expected Failure, but passed")
    }

    /// `Kind: message`
    pub fn summary(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }

    /// The trace without its trailing `Kind: message` lines. Empty when
    /// there is no trace.
    pub fn frames(&self) -> &str {
        let trace = self.trace.as_deref().unwrap_or_default().trim_end_matches('\n');
        match trace.strip_suffix(self.summary().as_str()) {
            Some(rest) if rest.is_empty() || rest.ends_with('\n') => rest.trim_end_matches('\n'),
            _ => trace,
        }
    }

    /// The raw trace text, guaranteed to end with the `Kind: message` lines
    /// and a newline. The message may itself span several lines.
    pub fn full_trace(&self) -> String {
        let summary = self.summary();
        match self.frames() {
            "" => format!("{}\n", summary),
            frames => format!("{}\n{}\n", frames, summary),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// The terminal classification of one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(ErrorInfo),
    Error(ErrorInfo),
    Skip(String),
    /// Counted as a pass.
    ExpectedFailure(ErrorInfo),
    /// Counted as a failure.
    UnexpectedSuccess,
}

impl Outcome {
    /// Reinterpret the outcome of a test that was expected to fail.
    pub fn expecting_failure(self) -> Self {
        match self {
            Outcome::Pass => Outcome::UnexpectedSuccess,
            Outcome::Fail(err) | Outcome::Error(err) => Outcome::ExpectedFailure(err),
            other => other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail(_) => "fail",
            Outcome::Error(_) => "error",
            Outcome::Skip(_) => "skip",
            Outcome::ExpectedFailure(_) => "expected-failure",
            Outcome::UnexpectedSuccess => "unexpected-success",
        }
    }
}
