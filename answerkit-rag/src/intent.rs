//! Conversational-intent detection and canned replies.
//!
//! A cheap, deterministic guard that keeps chit-chat off the retrieval
//! path: greetings, thanks, farewells, and identity/capability questions
//! are answered from a fixed response table without touching any provider.
//!
//! The vocabulary is data, not code, so tests can extend it without
//! changing the matching logic.

/// The kind of conversational message a query was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationalIntent {
    /// "hello", "hi", "good morning", ...
    Greeting,
    /// "thanks", "thank you", ...
    Thanks,
    /// "bye", "goodbye", "see you", ...
    Farewell,
    /// "how are you" and variants.
    HowAreYou,
    /// "help", "what can you do", ...
    Help,
    /// "who are you", "what are you", ...
    Identity,
    /// Short alphabetic small talk with no recognizable term.
    SmallTalk,
}

/// Term tables driving [`classify`]. Each table maps to one intent.
#[derive(Debug, Clone)]
pub struct IntentVocabulary {
    /// Greeting terms.
    pub greetings: Vec<String>,
    /// Gratitude terms.
    pub thanks: Vec<String>,
    /// Sign-off terms.
    pub farewells: Vec<String>,
    /// Status-question terms.
    pub how_are_you: Vec<String>,
    /// Help and capability-question terms.
    pub help: Vec<String>,
    /// Identity-question terms.
    pub identity: Vec<String>,
}

impl Default for IntentVocabulary {
    fn default() -> Self {
        let list = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect();
        Self {
            greetings: list(&[
                "hello",
                "hi",
                "hey",
                "good morning",
                "good afternoon",
                "good evening",
                "greetings",
            ]),
            thanks: list(&["thank", "thanks", "thx", "appreciate"]),
            farewells: list(&["bye", "goodbye", "see you", "farewell", "take care"]),
            how_are_you: list(&["how are you", "how's it going", "how do you do"]),
            help: list(&["help", "what can you do", "what do you do", "capabilities"]),
            identity: list(&["who are you", "what are you", "your name"]),
        }
    }
}

/// Maximum trimmed length for the short-alphabetic small-talk rule.
const SHORT_QUERY_LEN: usize = 10;

/// Classify a query as conversational, if it is one.
///
/// Matching is case-insensitive substring against the vocabulary tables,
/// checked in a fixed order so the first matching table wins. A query
/// shorter than 10 characters consisting only of letters and whitespace is
/// treated as small talk even when no term matches.
///
/// Only meaningful when the conversation history is empty; with history
/// present, short replies like "yes" are follow-ups, not small talk.
pub fn classify(query: &str, vocabulary: &IntentVocabulary) -> Option<ConversationalIntent> {
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    let tables = [
        (&vocabulary.greetings, ConversationalIntent::Greeting),
        (&vocabulary.thanks, ConversationalIntent::Thanks),
        (&vocabulary.farewells, ConversationalIntent::Farewell),
        (&vocabulary.how_are_you, ConversationalIntent::HowAreYou),
        (&vocabulary.help, ConversationalIntent::Help),
        (&vocabulary.identity, ConversationalIntent::Identity),
    ];
    for (terms, intent) in tables {
        if terms.iter().any(|term| lowered.contains(term.as_str())) {
            return Some(intent);
        }
    }

    let short_and_alphabetic = lowered.chars().count() < SHORT_QUERY_LEN
        && lowered.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
    if short_and_alphabetic {
        return Some(ConversationalIntent::SmallTalk);
    }

    None
}

/// The canned reply for a conversational intent.
pub fn canned_response(intent: ConversationalIntent) -> &'static str {
    match intent {
        ConversationalIntent::Greeting => {
            "Hello! I'm your product assistant. Ask me anything about our catalog — \
             prices, features, availability — and I'll look it up for you."
        }
        ConversationalIntent::Thanks => {
            "You're welcome! Let me know if there's anything else you'd like to know."
        }
        ConversationalIntent::Farewell => {
            "Goodbye! Feel free to come back whenever you have more questions."
        }
        ConversationalIntent::HowAreYou => {
            "I'm doing well, thank you! Ready to help with any product questions you have."
        }
        ConversationalIntent::Help => {
            "I can answer questions about the products in our knowledge base: prices, \
             specifications, categories, and availability. Just ask in plain language."
        }
        ConversationalIntent::Identity => {
            "I'm a product knowledge assistant. I search our product database to give \
             you accurate answers about what we offer."
        }
        ConversationalIntent::SmallTalk => {
            "I'm here to help with product questions! Try asking about a specific \
             product, its price, or its features."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(query: &str) -> Option<ConversationalIntent> {
        classify(query, &IntentVocabulary::default())
    }

    #[test]
    fn greetings_match_case_insensitively() {
        assert_eq!(classify_default("Hello"), Some(ConversationalIntent::Greeting));
        assert_eq!(classify_default("HEY there"), Some(ConversationalIntent::Greeting));
    }

    #[test]
    fn thanks_and_farewell_match() {
        assert_eq!(classify_default("thanks a lot"), Some(ConversationalIntent::Thanks));
        assert_eq!(classify_default("ok bye"), Some(ConversationalIntent::Farewell));
    }

    #[test]
    fn identity_and_help_match() {
        assert_eq!(classify_default("who are you?"), Some(ConversationalIntent::Identity));
        assert_eq!(classify_default("what can you do"), Some(ConversationalIntent::Help));
    }

    #[test]
    fn short_alphabetic_query_is_small_talk() {
        assert_eq!(classify_default("sup"), Some(ConversationalIntent::SmallTalk));
    }

    #[test]
    fn short_query_with_digits_is_not_small_talk() {
        assert_eq!(classify_default("a4 size"), None);
    }

    #[test]
    fn factual_question_is_not_conversational() {
        assert_eq!(classify_default("What is the price of Widget A?"), None);
    }

    #[test]
    fn vocabulary_is_extensible() {
        let mut vocabulary = IntentVocabulary::default();
        vocabulary.greetings.push("howdy".into());
        assert_eq!(
            classify("howdy partner", &vocabulary),
            Some(ConversationalIntent::Greeting)
        );
    }

    #[test]
    fn every_intent_has_a_nonempty_reply() {
        for intent in [
            ConversationalIntent::Greeting,
            ConversationalIntent::Thanks,
            ConversationalIntent::Farewell,
            ConversationalIntent::HowAreYou,
            ConversationalIntent::Help,
            ConversationalIntent::Identity,
            ConversationalIntent::SmallTalk,
        ] {
            assert!(!canned_response(intent).is_empty());
        }
    }
}
