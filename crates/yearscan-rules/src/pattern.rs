//! Digit-bounded regex scanning shared by the date and quarter tables

use regex::{Captures, Regex};

/// Which sides of a match must not touch another digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Guard {
    /// Neither the preceding nor the following character may be a digit
    Both,
    /// Only the following character is checked
    After,
}

/// Collect the non-overlapping matches of `regex` that satisfy `guard`.
///
/// A match rejected by the guard does not consume its span: scanning resumes
/// one character after its start, the same way a lookbehind/lookahead
/// failure moves a backtracking engine to the next position.
pub(crate) fn bounded_captures<'t>(regex: &Regex, text: &'t str, guard: Guard) -> Vec<Captures<'t>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        if is_bounded(text, whole.start(), whole.end(), guard) && !whole.is_empty() {
            pos = whole.end();
            found.push(caps);
        } else {
            pos = next_char_start(text, whole.start());
        }
    }

    found
}

/// Parse a numeric capture group
pub(crate) fn group_u32(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn is_bounded(text: &str, start: usize, end: usize, guard: Guard) -> bool {
    let digit_after = text[end..].chars().next().is_some_and(|c| c.is_ascii_digit());
    let digit_before = text[..start].chars().next_back().is_some_and(|c| c.is_ascii_digit());

    match guard {
        Guard::Both => !digit_before && !digit_after,
        Guard::After => !digit_after,
    }
}

fn next_char_start(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}
