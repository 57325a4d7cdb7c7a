//! Source excerpts with `^` markers under an error span.

use std::fmt::Write as _;

use crate::token::Position;

/// Render every source line touched by `start..end`, each followed by
/// a marker line with `^` under the covered columns.
///
/// At least one `^` is printed per line, so zero-width spans (such as
/// end of input) still point somewhere.
#[must_use]
pub fn render(start: &Position, end: &Position) -> String {
    let text = &start.source.text;
    let mut out = String::new();

    let last_line = end.line.max(start.line);
    for (offset, line) in text
        .split('\n')
        .skip(start.line.saturating_sub(1))
        .take(last_line - start.line + 1)
        .enumerate()
    {
        let line = line.trim_end_matches('\r');
        let number = start.line + offset;
        let width = line.chars().count();

        let from = if number == start.line {
            start.column.saturating_sub(1)
        } else {
            0
        };
        let to = if number == end.line {
            end.column.saturating_sub(1)
        } else {
            width
        };
        let carets = to.saturating_sub(from).max(1);

        let _ = writeln!(out, "{line}");
        let _ = writeln!(out, "{}{}", " ".repeat(from), "^".repeat(carets));
    }

    out
}
