//! Prompt construction for answer generation.
//!
//! Pure string assembly: persona preamble, numbered context section with
//! provenance annotations, an optional previous-conversation section, the
//! question, and the accuracy constraints. Nothing here fabricates content
//! beyond what the chunks and history supply.

use answerkit_core::{Message, Role};

use crate::document::RetrievedChunk;

/// The persona and accuracy contract placed in the system message.
pub const SYSTEM_PERSONA: &str = "You are an expert product assistant for our knowledge base. \
     You answer with 100% accuracy based strictly on the provided context. \
     When the context does not contain the answer, you say so plainly \
     instead of guessing.";

/// Build the instruction-augmented user prompt.
///
/// The prompt opens with the same persona and accuracy contract that is
/// also sent as the system message.
///
/// `history` should already be limited to the trailing window the caller
/// wants rendered; the previous-conversation section is present only when
/// it is non-empty.
pub fn build_prompt(query: &str, chunks: &[RetrievedChunk], history: &[Message]) -> String {
    let mut prompt = format!(
        "{SYSTEM_PERSONA}\n\n\
         Answer the customer's question using only the numbered context below.\n\n",
    );

    prompt.push_str("Context:\n");
    for (i, chunk) in chunks.iter().enumerate() {
        let mut annotation = format!("[{}", chunk.metadata.source);
        if let Some(row) = chunk.metadata.row {
            annotation.push_str(&format!(", row {row}"));
        }
        annotation.push(']');
        prompt.push_str(&format!("{}. {} {}\n", i + 1, annotation, chunk.text));
    }

    if !history.is_empty() {
        prompt.push_str("\nPrevious conversation:\n");
        for message in history {
            let speaker = match message.role {
                Role::Assistant => "Assistant",
                _ => "Customer",
            };
            prompt.push_str(&format!("{speaker}: {}\n", message.content));
        }
        prompt.push_str(
            "When the question refers to something by a pronoun or an implicit \
             reference, resolve it against this previous conversation.\n",
        );
    }

    prompt.push_str(&format!("\nQuestion: {query}\n\n"));
    prompt.push_str(
        "Answer using only the context above. Do not infer or invent details that \
         are not stated there. If the needed information is not in the context, \
         state that it is not available rather than guessing.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ChunkMetadata;

    fn chunk(text: &str, source: &str, row: Option<u64>) -> RetrievedChunk {
        RetrievedChunk {
            text: text.into(),
            metadata: ChunkMetadata { source: source.into(), row, chunk_type: None },
            score: 0.9,
        }
    }

    #[test]
    fn prompt_opens_with_persona_preamble() {
        let prompt = build_prompt("price?", &[chunk("x", "s", None)], &[]);
        assert!(prompt.starts_with(SYSTEM_PERSONA));
        assert!(prompt.contains("expert product assistant"));
        assert!(prompt.contains("100% accuracy"));
    }

    #[test]
    fn context_is_numbered_and_annotated() {
        let chunks = vec![
            chunk("Widget A: $19.99", "products", Some(3)),
            chunk("Widget B: $29.99", "products", None),
        ];
        let prompt = build_prompt("price?", &chunks, &[]);
        assert!(prompt.contains("1. [products, row 3] Widget A: $19.99"));
        assert!(prompt.contains("2. [products] Widget B: $29.99"));
    }

    #[test]
    fn history_section_absent_for_empty_history() {
        let prompt = build_prompt("price?", &[chunk("x", "s", None)], &[]);
        assert!(!prompt.contains("Previous conversation"));
    }

    #[test]
    fn history_section_present_with_follow_up_instruction() {
        let history = vec![Message::user("about Widget A"), Message::assistant("sure")];
        let prompt = build_prompt("what about the price", &[chunk("x", "s", None)], &history);
        assert!(prompt.contains("Previous conversation:"));
        assert!(prompt.contains("Customer: about Widget A"));
        assert!(prompt.contains("resolve it against this previous conversation"));
    }

    #[test]
    fn question_and_constraints_are_present() {
        let prompt = build_prompt("what is it?", &[chunk("x", "s", None)], &[]);
        assert!(prompt.contains("Question: what is it?"));
        assert!(prompt.contains("not available rather than guessing"));
    }
}
