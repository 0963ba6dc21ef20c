/// A raw trace split into the line that names the failure and the supporting
/// frames beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTrace {
    /// The final `Kind: message` line, without indentation.
    pub assertion: String,
    /// The remaining frames, each indented, joined with `\n`. May be empty.
    pub body: String,
}

/// Split a multi-line trace for display.
///
/// The trailing empty line is dropped, the last line becomes the assertion,
/// and the first remaining line (the call stack header) is discarded. Every
/// body line is prefixed with `indent` spaces.
pub fn format_trace(raw: &str, indent: usize) -> FormattedTrace {
    let mut lines: Vec<&str> = raw.split('\n').collect();

    if lines.last() == Some(&"") {
        lines.pop();
    }

    let assertion = lines.pop().unwrap_or_default().to_string();
    let body = indent_body(lines, indent);

    FormattedTrace { assertion, body }
}

/// Indent trace frames that no longer carry their `Kind: message` line,
/// dropping the call stack header.
pub fn format_frames(frames: &str, indent: usize) -> String {
    let lines: Vec<&str> = frames.trim_end_matches('\n').split('\n').collect();
    indent_body(lines, indent)
}

fn indent_body(mut lines: Vec<&str>, indent: usize) -> String {
    if !lines.is_empty() {
        lines.remove(0);
    }

    let pad = " ".repeat(indent);
    lines
        .iter()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
