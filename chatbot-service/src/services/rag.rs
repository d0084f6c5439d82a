//! Retrieval-augmented answering: stuff retrieved documents into the RAG
//! prompt and ask the chat model.

use crate::error::ChatbotError;
use crate::services::documents::Document;
use crate::services::prompts::rag_prompt;
use crate::services::providers::{invoke_chat, ChatProvider, GenerationParams};
use std::collections::HashMap;

/// Temperature used for answers grounded in retrieved documents.
pub const RAG_TEMPERATURE: f32 = 0.2;

/// Join document contents into one context block.
pub fn stuff_documents(docs: &[Document]) -> String {
    docs.iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub async fn answer_with_context(
    provider: &dyn ChatProvider,
    question: &str,
    docs: &[Document],
    params: &GenerationParams,
) -> Result<String, ChatbotError> {
    let vars = HashMap::from([
        ("question", question.to_string()),
        ("context", stuff_documents(docs)),
    ]);
    let messages = rag_prompt()?.format(&vars)?;

    Ok(invoke_chat(provider, &messages, params).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockChatProvider;

    #[test]
    fn stuffed_context_separates_documents_with_blank_lines() {
        let docs = [Document::new("first"), Document::new("second")];
        assert_eq!(stuff_documents(&docs), "first\n\nsecond");
    }

    #[tokio::test]
    async fn answer_sends_question_and_context_in_one_prompt() {
        let provider = MockChatProvider::new();
        let answer = answer_with_context(
            &provider,
            "What is the warranty?",
            &[Document::new("Two years.")],
            &GenerationParams::with_temperature(RAG_TEMPERATURE),
        )
        .await
        .unwrap();

        assert!(answer.contains("Question: What is the warranty?"));
        assert!(answer.contains("Context: Two years."));
    }
}
