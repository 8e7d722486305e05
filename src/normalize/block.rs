//! Suggestion block matching
//!
//! Models rarely reproduce the requested delimiters exactly, so the block is
//! located by an ordered list of matchers, strictest first. The first one
//! that matches wins and only one block is ever extracted:
//!
//! ```text
//! Answer text.
//! [SUGGESTIONS]
//! 1. First follow-up question?
//! 2. Second follow-up question?
//! [/SUGGESTIONS]
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::filter::{MIN_BLOCK_LINE_LEN, strip_number_prefix};
use super::MAX_SUGGESTIONS;

/// A located suggestion block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMatch {
    /// Byte range of the whole block, markers included
    pub span: Range<usize>,
    /// Text between the markers
    pub interior: String,
    /// Name of the matcher that found the block
    pub matcher: &'static str,
}

/// A named block matcher
struct BlockMatcher {
    name: &'static str,
    regex: Regex,
}

impl BlockMatcher {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("built-in block pattern must compile"),
        }
    }
}

/// Matchers in priority order
static MATCHERS: LazyLock<Vec<BlockMatcher>> = LazyLock::new(|| {
    vec![
        BlockMatcher::new("exact", r"(?is)\[suggestions\](.*?)\[/suggestions\]"),
        BlockMatcher::new(
            "spaced",
            r"(?is)\[\s*suggestions?\s*:?\s*\](.*?)\[\s*/\s*suggestions?\s*\]",
        ),
        BlockMatcher::new(
            "misspelled-close",
            r"(?is)\[\s*suggestions?\s*:?\s*\](.*?)\[\s*/\s*s[a-z]*\s*\]",
        ),
        BlockMatcher::new(
            "any-close",
            r"(?is)\[\s*suggestions?\s*:?\s*\](.*?)\[\s*/[^\]\n]*\]",
        ),
        BlockMatcher::new("unclosed", r"(?is)\[\s*suggestions?\s*:?\s*\](.*)\z"),
    ]
});

/// Open or canonical close markers left behind after extraction
static STRAY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*/?\s*suggestions?\s*:?\s*\]").expect("marker pattern must compile")
});

/// Locate the suggestion block, if any
pub fn find_block(text: &str) -> Option<BlockMatch> {
    MATCHERS.iter().find_map(|matcher| {
        let captures = matcher.regex.captures(text)?;
        let whole = captures.get(0)?;
        let interior = captures.get(1).map_or("", |m| m.as_str());

        log::debug!("Suggestion block found by {} matcher", matcher.name);

        Some(BlockMatch {
            span: whole.range(),
            interior: interior.to_string(),
            matcher: matcher.name,
        })
    })
}

/// Remove the block from `text`, returning what surrounds it
pub fn remove_block(text: &str, block: &BlockMatch) -> String {
    let mut remaining = String::with_capacity(text.len());
    remaining.push_str(&text[..block.span.start]);
    remaining.push_str(&text[block.span.end..]);
    remaining
}

/// Collect the first numbered lines of a block interior
pub fn block_candidates(interior: &str) -> Vec<String> {
    interior
        .lines()
        .filter_map(strip_number_prefix)
        .filter(|item| item.chars().count() > MIN_BLOCK_LINE_LEN)
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

/// Strip any marker text still present in the main content
///
/// Repeats until nothing matches, since removing one marker can join the
/// text around it into another.
pub fn scrub_markers(text: &str) -> String {
    let mut scrubbed = text.to_string();
    while STRAY_MARKER.is_match(&scrubbed) {
        scrubbed = STRAY_MARKER.replace_all(&scrubbed, "").into_owned();
    }
    scrubbed
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod block_tests;
