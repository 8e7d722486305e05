//! Line-level helpers shared by the block and fallback passes

/// Block lines at or below this many characters are skipped before the
/// first two are taken
pub const MIN_BLOCK_LINE_LEN: usize = 5;

/// Suggestions at or below this many characters never reach the caller
pub const MIN_SUGGESTION_LEN: usize = 10;

/// Generic follow-ups the models like to pad their lists with
const DENYLIST: [&str; 2] = ["tell me more about", "what else would you like"];

/// Strip a leading `N.` list marker
///
/// Returns the remaining text trimmed, or `None` when the line does not
/// start with one or more ASCII digits followed by a period.
pub fn strip_number_prefix(line: &str) -> Option<&str> {
    let line = line.trim();
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }

    line[digits..].strip_prefix('.').map(str::trim)
}

/// Whether a candidate passes the final quality gate
pub fn is_quality_suggestion(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.chars().count() <= MIN_SUGGESTION_LEN {
        return false;
    }

    let lower = candidate.to_lowercase();
    !DENYLIST.iter().any(|phrase| lower.contains(phrase))
}

/// Drop candidates that fail the quality gate, keeping order
pub fn retain_quality(candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let keep = is_quality_suggestion(candidate);
            if !keep {
                log::debug!("Dropping low-quality suggestion: {:?}", candidate);
            }
            keep
        })
        .collect()
}
