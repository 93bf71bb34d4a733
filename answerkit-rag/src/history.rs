//! Conversation-history context extraction and follow-up detection.
//!
//! Both functions are pure. The extracted context is used only to augment
//! retrieval queries for follow-up disambiguation, never for prompting
//! directly; the prompt builder renders history on its own.

use answerkit_core::{Message, Role};

/// Markers that suggest a query depends on unstated prior context:
/// pronouns, elliptical phrasings, and bare attribute nouns.
const FOLLOW_UP_MARKERS: &[&str] = &[
    "it",
    "its",
    "they",
    "them",
    "those",
    "these",
    "that one",
    "this one",
    "what about",
    "how about",
    "and the",
    "tell me",
    "more about",
    "price",
    "cost",
    "category",
    "features",
    "available",
    "stock",
    "color",
    "size",
];

/// Derive a plain-text summary of the trailing conversation window.
///
/// Takes the last `window` turns, concatenates user contents and assistant
/// contents separately, and joins both blocks. Returns an empty string for
/// empty history.
pub fn history_context(history: &[Message], window: usize) -> String {
    if history.is_empty() {
        return String::new();
    }

    let recent = &history[history.len().saturating_sub(window)..];

    let user_text: Vec<&str> = recent
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();
    let assistant_text: Vec<&str> = recent
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|m| m.content.as_str())
        .collect();

    let mut parts = Vec::new();
    if !user_text.is_empty() {
        parts.push(user_text.join(" "));
    }
    if !assistant_text.is_empty() {
        parts.push(assistant_text.join(" "));
    }
    parts.join(" | ")
}

/// Whether the query reads like a follow-up to earlier turns.
///
/// Case-insensitive substring match against a fixed marker vocabulary.
/// Follow-ups get a looser relevance threshold and may trigger the
/// history-enhanced retrieval pass, because the query text alone
/// under-specifies what is being asked about.
pub fn is_follow_up(query: &str) -> bool {
    is_follow_up_with(query, FOLLOW_UP_MARKERS)
}

/// [`is_follow_up`] with a caller-supplied marker table.
pub fn is_follow_up_with(query: &str, markers: &[&str]) -> bool {
    let lowered = query.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_yields_empty_context() {
        assert_eq!(history_context(&[], 6), "");
    }

    #[test]
    fn context_separates_user_and_assistant_blocks() {
        let history = vec![
            Message::user("Tell me about Widget A"),
            Message::assistant("Widget A is our flagship widget."),
            Message::user("And Widget B?"),
        ];
        let context = history_context(&history, 6);
        assert_eq!(
            context,
            "Tell me about Widget A And Widget B? | Widget A is our flagship widget."
        );
    }

    #[test]
    fn context_only_reads_the_trailing_window() {
        let mut history: Vec<Message> =
            (0..10).map(|i| Message::user(format!("turn {i}"))).collect();
        history.push(Message::assistant("latest answer"));
        let context = history_context(&history, 6);
        assert!(!context.contains("turn 0"));
        assert!(context.contains("turn 9"));
        assert!(context.contains("latest answer"));
    }

    #[test]
    fn pronouns_and_attributes_flag_follow_ups() {
        assert!(is_follow_up("what about the price"));
        assert!(is_follow_up("is it available?"));
        assert!(is_follow_up("tell me more"));
    }

    #[test]
    fn self_contained_question_is_not_a_follow_up() {
        assert!(!is_follow_up("Compare Widget A and Widget B specs"));
    }

    #[test]
    fn custom_marker_table_is_honored() {
        assert!(is_follow_up_with("qué precio tiene", &["precio"]));
        assert!(!is_follow_up_with("what about it", &["precio"]));
    }
}
