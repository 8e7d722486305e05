//! Trailing question list detection
//!
//! Used when the model skipped the suggestion block but still ended its
//! answer with a short numbered list of follow-up questions.

use super::filter::strip_number_prefix;
use super::MAX_SUGGESTIONS;

/// How many trailing non-empty lines are inspected
const TRAILING_WINDOW: usize = 5;

/// Minimum length of a candidate line, prefix included
const MIN_LINE_LEN: usize = 15;

const QUESTION_KEYWORDS: [&str; 4] = ["how", "what", "why", "can you"];

/// Suggestions recovered from the tail of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingList {
    pub suggestions: Vec<String>,
    /// The input with the recovered lines removed
    pub remaining: String,
}

/// Whether a line looks like a numbered follow-up question
fn is_question_line(line: &str) -> bool {
    let line = line.trim();
    if strip_number_prefix(line).is_none() || line.chars().count() <= MIN_LINE_LEN {
        return false;
    }

    let lower = line.to_lowercase();
    lower.contains('?') || QUESTION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Look for at least two numbered questions among the last lines of `text`
///
/// Returns `None` unless two qualifying lines are found; partial lists are
/// left in place. When a list is found, the first two questions become the
/// suggestions and every qualifying line is removed. Removal repeats on the
/// shrunken window until it holds fewer than two questions.
pub fn find_trailing_list(text: &str) -> Option<TrailingList> {
    let lines: Vec<&str> = text.lines().collect();
    let mut removed = vec![false; lines.len()];
    let mut suggestions: Vec<String> = Vec::new();

    loop {
        let window: Vec<usize> = lines
            .iter()
            .enumerate()
            .rev()
            .filter(|&(idx, line)| !removed[idx] && !line.trim().is_empty())
            .take(TRAILING_WINDOW)
            .map(|(idx, _)| idx)
            .collect();

        let mut qualifying: Vec<usize> = window
            .into_iter()
            .filter(|&idx| is_question_line(lines[idx]))
            .collect();
        if qualifying.len() < MAX_SUGGESTIONS {
            break;
        }
        qualifying.sort_unstable();

        if suggestions.is_empty() {
            suggestions = qualifying
                .iter()
                .filter_map(|&idx| strip_number_prefix(lines[idx]))
                .take(MAX_SUGGESTIONS)
                .map(str::to_string)
                .collect();
        } else {
            log::debug!("Removing {} further trailing questions", qualifying.len());
        }

        for idx in qualifying {
            removed[idx] = true;
        }
    }

    if suggestions.is_empty() {
        return None;
    }

    let remaining = lines
        .iter()
        .enumerate()
        .filter(|&(idx, _)| !removed[idx])
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    Some(TrailingList {
        suggestions,
        remaining,
    })
}

#[cfg(test)]
#[path = "fallback_tests.rs"]
mod fallback_tests;
