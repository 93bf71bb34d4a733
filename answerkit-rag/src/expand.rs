//! LLM-backed query expansion.
//!
//! Widens retrieval recall by asking the chat model for alternative
//! phrasings of the user's question. Expansion is strictly best-effort: any
//! provider failure degrades to the original query alone and never aborts
//! the request.

use std::sync::Arc;

use tracing::{debug, warn};

use answerkit_core::{ChatModel, GenerateConfig, Message};

use crate::config::RagConfig;

/// How many trailing history turns inform context-aware expansions.
const EXPANSION_HISTORY_WINDOW: usize = 4;

/// Maximum lines taken from the model's response before the original query
/// is prepended.
const MAX_PARSED_LINES: usize = 5;

/// Produces alternative phrasings of a query via the chat model.
pub struct QueryExpander {
    model: Arc<dyn ChatModel>,
}

impl QueryExpander {
    /// Create an expander backed by the given chat model.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Expand `query` into up to `config.max_expansions` retrieval queries.
    ///
    /// The original query is always first. On any provider error the result
    /// degrades to `[query]`; expansion failure reduces recall, not
    /// availability.
    pub async fn expand(
        &self,
        query: &str,
        history: &[Message],
        config: &RagConfig,
    ) -> Vec<String> {
        let prompt = expansion_prompt(query, history);
        let generate_config =
            GenerateConfig { temperature: Some(0.7), max_output_tokens: Some(256) };

        let alternatives = match self
            .model
            .generate(&[Message::user(prompt)], &generate_config)
            .await
        {
            Ok(response) => parse_expansions(&response),
            Err(e) => {
                warn!(error = %e, "query expansion failed, using original query only");
                Vec::new()
            }
        };

        let mut queries = Vec::with_capacity(alternatives.len() + 1);
        queries.push(query.to_string());
        for alternative in alternatives {
            if !queries.contains(&alternative) {
                queries.push(alternative);
            }
        }
        queries.truncate(config.max_expansions);

        debug!(count = queries.len(), "expanded query set ready");
        queries
    }
}

/// Build the expansion instruction prompt.
fn expansion_prompt(query: &str, history: &[Message]) -> String {
    let mut prompt = String::from(
        "Generate 3 to 5 alternative phrasings of the following product question. \
         Include synonyms, product-specific wording, and variants that resolve \
         references using the recent conversation. Return one phrasing per line \
         with no numbering and no extra commentary.\n\n",
    );

    let recent = &history[history.len().saturating_sub(EXPANSION_HISTORY_WINDOW)..];
    if !recent.is_empty() {
        prompt.push_str("Recent conversation:\n");
        for message in recent {
            let speaker = match message.role {
                answerkit_core::Role::Assistant => "Assistant",
                _ => "User",
            };
            prompt.push_str(&format!("{speaker}: {}\n", message.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("Question: {query}\n"));
    prompt
}

/// Parse a line-per-phrasing model response.
///
/// Splits on line breaks, trims, drops empty lines, caps at five lines.
pub fn parse_expansions(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_PARSED_LINES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_drops_empty_lines() {
        let parsed = parse_expansions("  first\n\n second \n");
        assert_eq!(parsed, vec!["first", "second"]);
    }

    #[test]
    fn parse_caps_at_five_lines() {
        let parsed = parse_expansions("a\nb\nc\nd\ne\nf\ng");
        assert_eq!(parsed.len(), 5);
    }

    #[test]
    fn parse_of_empty_response_is_empty() {
        assert!(parse_expansions("").is_empty());
        assert!(parse_expansions("\n\n").is_empty());
    }

    #[test]
    fn prompt_includes_question_and_recent_history() {
        let history = vec![Message::user("about Widget A"), Message::assistant("sure")];
        let prompt = expansion_prompt("what about the price", &history);
        assert!(prompt.contains("Question: what about the price"));
        assert!(prompt.contains("about Widget A"));
    }
}
