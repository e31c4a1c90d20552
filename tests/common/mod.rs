#![allow(dead_code)]

use ascribe::{Blame, Blamer};
use pretty_assertions::assert_eq;

/// Splits `text` into owned lines, the way a history walker would hand out a
/// snapshot of a text file.
pub fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Builds a history from `(revision, text)` pairs, newest first.
pub fn history(revisions: &[(&'static str, &str)]) -> Vec<(&'static str, Vec<String>)> {
    revisions.iter().map(|(r, text)| (*r, lines(text))).collect()
}

/// Feeds `history` to a session one revision at a time, followed by the
/// end-of-history sentinel.
pub fn blame_incrementally(
    history: Vec<(&'static str, Vec<String>)>,
) -> Blame<String, &'static str> {
    let blamer = Blamer::default();
    let mut history = history.into_iter();

    let (revision, content) = history.next().expect("at least one revision");
    let mut session = blamer
        .blame(None, Some(revision), Some(content.as_slice()))
        .expect("able to start a blame");

    for (revision, content) in history {
        session = blamer
            .blame(Some(session), Some(revision), Some(content.as_slice()))
            .expect("able to advance the blame");
    }

    blamer
        .blame(Some(session), None, None)
        .expect("able to end the blame")
        .finish()
        .expect("complete blame")
}

// Render a blame as "<revision> <line>" strings. With pretty assertions that
// is much more pleasant to debug than comparing revisions alone.
pub fn render<R: std::fmt::Display>(blame: &Blame<String, R>) -> Vec<String> {
    blame
        .blamed_lines()
        .map(|bl| format!("{} {}", bl.revision, bl.line))
        .collect()
}

pub fn compare(blame: &Blame<String, &str>, expected: &[&str]) {
    let expected: Vec<String> = blame
        .contents()
        .iter()
        .zip(expected)
        .map(|(line, r)| format!("{} {}", r, line))
        .collect();

    assert_eq!(render(blame), expected);
}
