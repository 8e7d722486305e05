//! Response normalization
//!
//! Turns the raw text of a model completion into the answer shown to the
//! user plus up to two follow-up suggestions. The models do not reliably
//! honour the requested output format, so every stage degrades to a
//! best-effort result instead of failing.

pub mod block;
pub mod fallback;
pub mod filter;

use serde::Serialize;

/// Upper bound on returned suggestions
pub const MAX_SUGGESTIONS: usize = 2;

/// Main content used when the model produced no text at all
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I processed your request but couldn't generate a proper response.";

/// A completion split into answer and follow-up suggestions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub main_content: String,
    pub suggestions: Vec<String>,
}

impl NormalizedResponse {
    /// Placeholder for empty completions
    pub fn empty_fallback() -> Self {
        Self {
            main_content: EMPTY_RESPONSE_FALLBACK.to_string(),
            suggestions: Vec::new(),
        }
    }
}

/// Normalize a raw completion
///
/// Order of operations:
/// 1. Cut the first suggestion block found by the ordered matchers and take
///    its numbered lines.
/// 2. If that produced nothing, look for a numbered question list among the
///    last lines of the text.
///    Every qualifying question near the end is removed, not just the two
///    returned, so the remaining text normalizes to itself.
/// 3. Drop short or generic candidates.
/// 4. Trim the remaining text.
pub fn normalize(raw: &str) -> NormalizedResponse {
    if raw.trim().is_empty() {
        log::warn!("Empty completion, substituting fallback response");
        return NormalizedResponse::empty_fallback();
    }

    let (remaining, mut candidates) = match block::find_block(raw) {
        Some(found) => {
            let candidates = block::block_candidates(&found.interior);
            if candidates.is_empty() {
                log::debug!("Suggestion block had no usable lines");
            }
            (block::remove_block(raw, &found), candidates)
        }
        None => (raw.to_string(), Vec::new()),
    };

    // Scrub before the trailing scan so marker-only lines do not take up
    // room in its window
    let mut content = block::scrub_markers(&remaining);

    if candidates.is_empty()
        && let Some(trailing) = fallback::find_trailing_list(&content)
    {
        log::debug!("Recovered suggestions from trailing question list");
        content = trailing.remaining;
        candidates = trailing.suggestions;
    }

    let suggestions = filter::retain_quality(candidates);

    let mut main_content = content.trim().to_string();
    if main_content.is_empty() {
        main_content = EMPTY_RESPONSE_FALLBACK.to_string();
    }

    NormalizedResponse {
        main_content,
        suggestions,
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod normalize_tests;
