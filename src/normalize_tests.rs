//! Tests for response normalization

use super::*;
use proptest::prelude::*;

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_well_formed_block() {
    let raw = "Paris is the capital.\n[SUGGESTIONS]\n1. What is the population of Paris?\n2. What are famous landmarks?\n[/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Paris is the capital.");
    assert_eq!(
        normalized.suggestions,
        vec![
            "What is the population of Paris?".to_string(),
            "What are famous landmarks?".to_string(),
        ]
    );
}

#[test]
fn test_unclosed_block_runs_to_end() {
    let raw = "Answer text.\n[SUGGESTIONS]\n1. A valid long enough question?\n2. Another valid long enough question?";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Answer text.");
    assert_eq!(
        normalized.suggestions,
        vec![
            "A valid long enough question?".to_string(),
            "Another valid long enough question?".to_string(),
        ]
    );
}

#[test]
fn test_trailing_question_list_without_block() {
    let raw = "Caching stores results for reuse.\nIt cuts repeated work.\nCommon follow-ups:\n1. How does caching improve performance?\n2. What are common eviction policies?";
    let normalized = normalize(raw);

    assert_eq!(
        normalized.main_content,
        "Caching stores results for reuse.\nIt cuts repeated work.\nCommon follow-ups:"
    );
    assert_eq!(
        normalized.suggestions,
        vec![
            "How does caching improve performance?".to_string(),
            "What are common eviction policies?".to_string(),
        ]
    );
}

#[test]
fn test_generic_and_short_suggestions_are_filtered() {
    let raw = "Here you go.\n[SUGGESTIONS]\n1. Tell me more about pricing plans?\n2. Why not?\n[/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Here you go.");
    assert!(normalized.suggestions.is_empty());
}

#[test]
fn test_filter_can_leave_one_suggestion() {
    let raw = "Done.\n[SUGGESTIONS]\n1. What else would you like to explore?\n2. How do I invite my whole team?\n[/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(
        normalized.suggestions,
        vec!["How do I invite my whole team?".to_string()]
    );
}

#[test]
fn test_empty_input_uses_fallback_sentence() {
    assert_eq!(normalize(""), NormalizedResponse::empty_fallback());
    assert_eq!(normalize("  \n\t "), NormalizedResponse::empty_fallback());
    assert_eq!(
        normalize("").main_content,
        "I processed your request but couldn't generate a proper response."
    );
}

#[test]
fn test_misspelled_closing_tag() {
    let raw = "Paris is the capital.\n[SUGGESTIONS]\n1. What is the population of Paris?\n2. What are famous landmarks?\n[/SUSTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Paris is the capital.");
    assert_eq!(normalized.suggestions.len(), 2);
    assert_eq!(normalized.suggestions[1], "What are famous landmarks?");
}

// =========================================================================
// Edge Cases
// =========================================================================

#[test]
fn test_no_block_no_list_returns_trimmed_input() {
    let raw = "\n  Kanban boards visualise work in progress.  \n";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Kanban boards visualise work in progress.");
    assert!(normalized.suggestions.is_empty());
}

#[test]
fn test_empty_block_falls_back_to_trailing_list() {
    let raw = "Intro\n1. How do I create a project board?\n2. What integrations are available?\n[SUGGESTIONS]\n[/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Intro");
    assert_eq!(
        normalized.suggestions,
        vec![
            "How do I create a project board?".to_string(),
            "What integrations are available?".to_string(),
        ]
    );
}

#[test]
fn test_block_in_the_middle_keeps_surrounding_text() {
    let raw = "Before.\n[SUGGESTIONS]\n1. How are milestones tracked?\n[/SUGGESTIONS]\nAfter.";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Before.\n\nAfter.");
    assert_eq!(normalized.suggestions, vec!["How are milestones tracked?".to_string()]);
}

#[test]
fn test_block_only_response_keeps_suggestions() {
    let raw = "[SUGGESTIONS]\n1. How do I export a report?\n2. Can tasks have subtasks?\n[/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, EMPTY_RESPONSE_FALLBACK);
    assert_eq!(normalized.suggestions.len(), 2);
}

#[test]
fn test_stray_close_marker_is_scrubbed() {
    let raw = "Answer with a leftover tag [/SUGGESTIONS]";
    let normalized = normalize(raw);

    assert_eq!(normalized.main_content, "Answer with a leftover tag");
    assert!(normalized.suggestions.is_empty());
}

#[test]
fn test_marker_rebuilt_by_removal_is_scrubbed() {
    let normalized = normalize("Answer [SUGG[/SUGGESTIONS]ESTIONS] end");

    assert_eq!(normalized.main_content, "Answer  end");
    assert!(normalized.suggestions.is_empty());
}

#[test]
fn test_more_than_two_trailing_questions_renormalize_cleanly() {
    let raw = "Intro text here.\n1. How does sprint planning work?\n2. How does backlog grooming work?\n3. How does velocity tracking work?\n4. How does burndown charting work?";
    let once = normalize(raw);

    assert_eq!(once.main_content, "Intro text here.");
    assert_eq!(
        once.suggestions,
        vec![
            "How does sprint planning work?".to_string(),
            "How does backlog grooming work?".to_string(),
        ]
    );

    let twice = normalize(&once.main_content);
    assert_eq!(twice.main_content, once.main_content);
    assert!(twice.suggestions.is_empty());
}

#[test]
fn test_serializes_camel_case() {
    let normalized = normalize("Hi.\n[SUGGESTIONS]\n1. What does the free plan include?\n[/SUGGESTIONS]");
    let json = serde_json::to_value(&normalized).unwrap();

    assert_eq!(json["mainContent"], "Hi.");
    assert_eq!(json["suggestions"][0], "What does the free plan include?");
}

// =========================================================================
// Property-Based Tests
// =========================================================================

fn response_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ,.?]{0,40}",
        "[0-9]{1,2}\\. [A-Za-z ?]{0,40}",
        Just("[SUGGESTIONS]".to_string()),
        Just("[/SUGGESTIONS]".to_string()),
        Just("[/SUSTIONS]".to_string()),
        Just("Split [SUGG[/SUGGESTIONS]ESTIONS] marker".to_string()),
        Just("1. Tell me more about the roadmap?".to_string()),
        Just("2. How do I assign a task to someone?".to_string()),
    ]
}

fn response_text() -> impl Strategy<Value = String> {
    prop::collection::vec(response_line(), 0..12).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_at_most_two_suggestions(raw in response_text()) {
        let normalized = normalize(&raw);
        prop_assert!(normalized.suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn prop_suggestions_pass_quality_gate(raw in response_text()) {
        let normalized = normalize(&raw);
        for suggestion in &normalized.suggestions {
            prop_assert!(suggestion.trim().chars().count() > 10, "too short: {:?}", suggestion);
            let lower = suggestion.to_lowercase();
            prop_assert!(!lower.contains("tell me more about"));
            prop_assert!(!lower.contains("what else would you like"));
        }
    }

    #[test]
    fn prop_main_content_has_no_markers(raw in response_text()) {
        let lower = normalize(&raw).main_content.to_lowercase();
        prop_assert!(!lower.contains("[suggestions]"));
        prop_assert!(!lower.contains("[/suggestions]"));
    }

    #[test]
    fn prop_main_content_is_trimmed_and_non_empty(raw in response_text()) {
        let main_content = normalize(&raw).main_content;
        prop_assert!(!main_content.is_empty());
        prop_assert_eq!(main_content.trim(), main_content.as_str());
    }

    #[test]
    fn prop_renormalizing_main_content_is_stable(
        answer in prop::collection::vec("[A-Za-z][A-Za-z ,.]{0,40}", 1..6),
        first in "[A-Za-z][A-Za-z ]{12,40}\\?",
        second in "[A-Za-z][A-Za-z ]{12,40}\\?",
    ) {
        let raw = format!(
            "{}\n[SUGGESTIONS]\n1. {}\n2. {}\n[/SUGGESTIONS]",
            answer.join("\n"),
            first,
            second
        );
        let once = normalize(&raw);
        let twice = normalize(&once.main_content);

        prop_assert_eq!(&twice.main_content, &once.main_content);
        prop_assert!(twice.suggestions.is_empty());
    }

    #[test]
    fn prop_renormalizing_after_trailing_list_is_stable(
        answer in prop::collection::vec("[A-Za-z][A-Za-z ,.]{0,40}", 1..6),
        questions in prop::collection::vec("[A-Za-z][A-Za-z ]{12,40}\\?", 2..9),
    ) {
        let numbered: Vec<String> = questions
            .iter()
            .enumerate()
            .map(|(i, question)| format!("{}. {}", i + 1, question))
            .collect();
        let raw = format!("{}\n{}", answer.join("\n"), numbered.join("\n"));

        let once = normalize(&raw);
        prop_assert_eq!(&once.main_content, &answer.join("\n").trim().to_string());

        let twice = normalize(&once.main_content);
        prop_assert_eq!(&twice.main_content, &once.main_content);
        prop_assert!(twice.suggestions.is_empty());
    }
}
