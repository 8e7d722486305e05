//! Tests for trailing question list detection

use super::*;

#[test]
fn test_two_trailing_questions_are_recovered() {
    let text = "Caching keeps hot data close.\nIt trades memory for latency.\nYou might also ask:\n1. How does caching improve performance?\n2. What are common eviction policies?";
    let found = find_trailing_list(text).expect("trailing list should be found");

    assert_eq!(
        found.suggestions,
        vec![
            "How does caching improve performance?".to_string(),
            "What are common eviction policies?".to_string(),
        ]
    );
    assert_eq!(
        found.remaining,
        "Caching keeps hot data close.\nIt trades memory for latency.\nYou might also ask:"
    );
}

#[test]
fn test_single_question_is_left_alone() {
    let text = "Answer.\n1. How does caching improve performance?";
    assert!(find_trailing_list(text).is_none());
}

#[test]
fn test_plain_numbered_steps_are_not_questions() {
    let text = "Setup:\n1. Install the package globally\n2. Run the migration script";
    assert!(find_trailing_list(text).is_none());
}

#[test]
fn test_short_lines_do_not_qualify() {
    let text = "Answer.\n1. Why so?\n2. How come?";
    assert!(find_trailing_list(text).is_none());
}

#[test]
fn test_only_last_five_non_empty_lines_are_scanned() {
    let text = "1. How does caching improve performance?\n2. What are common eviction policies?\n\nOne.\nTwo.\nThree.\nFour.\n\nFive.";
    assert!(find_trailing_list(text).is_none());
}

#[test]
fn test_blank_lines_do_not_shrink_the_window() {
    let text = "Intro.\n\n1. How do I add a team member?\n\n\n2. Can you explain sprint velocity\n\nThanks!";
    let found = find_trailing_list(text).expect("trailing list should be found");

    assert_eq!(
        found.suggestions,
        vec![
            "How do I add a team member?".to_string(),
            "Can you explain sprint velocity".to_string(),
        ]
    );
    assert_eq!(found.remaining, "Intro.\n\n\n\n\nThanks!");
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    let text = "Answer.\n1. WHAT does the roadmap include\n2. WHY use kanban boards here";
    let found = find_trailing_list(text).expect("trailing list should be found");
    assert_eq!(found.suggestions.len(), 2);
}

#[test]
fn test_extra_questions_are_removed_but_not_returned() {
    let text = "Intro text here.\n1. How does sprint planning work?\n2. How does backlog grooming work?\n3. How does velocity tracking work?\n4. How does burndown charting work?";
    let found = find_trailing_list(text).expect("trailing list should be found");

    assert_eq!(
        found.suggestions,
        vec![
            "How does sprint planning work?".to_string(),
            "How does backlog grooming work?".to_string(),
        ]
    );
    assert_eq!(found.remaining, "Intro text here.");
}

#[test]
fn test_long_question_lists_are_removed_past_the_window() {
    let questions: Vec<String> = (1..=7)
        .map(|n| format!("{}. What happens in release step {}?", n, n))
        .collect();
    let text = format!("Release notes.\n{}", questions.join("\n"));
    let found = find_trailing_list(&text).expect("trailing list should be found");

    assert_eq!(
        found.suggestions,
        vec![
            "What happens in release step 3?".to_string(),
            "What happens in release step 4?".to_string(),
        ]
    );
    assert_eq!(found.remaining, "Release notes.");
    assert!(find_trailing_list(&found.remaining).is_none());
}
