//! Chat prompt templates with `{name}` placeholders.

use crate::services::providers::{ChatMessage, ChatRole};
use std::collections::HashMap;
use thiserror::Error;

/// System prompt of the simple bot.
pub const SIMPLE_BOT_SYSTEM_PROMPT: &str = "당신은 근대사 역사학자입니다.";

/// Question-answering prompt over retrieved context (the public `rlm/rag-prompt`).
pub const RAG_PROMPT_TEMPLATE: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, just say that you don't know. \
Use three sentences maximum and keep the answer concise.\n\
Question: {question} \nContext: {context} \nAnswer:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing value for prompt variable '{0}'")]
    MissingVariable(String),

    #[error("Unclosed placeholder in template: {0}")]
    UnclosedPlaceholder(String),

    #[error("Unknown message role '{0}'")]
    UnknownRole(String),
}

#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<(ChatRole, String)>,
}

impl ChatPromptTemplate {
    /// Build from `(role, template)` pairs; roles are `system`, `user`/`human`
    /// and `assistant`/`ai`.
    pub fn from_messages(messages: &[(&str, &str)]) -> Result<Self, PromptError> {
        let messages = messages
            .iter()
            .map(|(role, template)| {
                ChatRole::parse(role)
                    .map(|r| (r, template.to_string()))
                    .ok_or_else(|| PromptError::UnknownRole(role.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { messages })
    }

    pub fn format(&self, vars: &HashMap<&str, String>) -> Result<Vec<ChatMessage>, PromptError> {
        self.messages
            .iter()
            .map(|(role, template)| {
                Ok(ChatMessage {
                    role: *role,
                    content: render(template, vars)?,
                })
            })
            .collect()
    }
}

/// Substitute `{name}` placeholders. Values are inserted verbatim, so braces
/// inside user input are never re-expanded.
fn render(template: &str, vars: &HashMap<&str, String>) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| PromptError::UnclosedPlaceholder(template.to_string()))?;
        let name = &after[..close];
        let value = vars
            .get(name)
            .ok_or_else(|| PromptError::MissingVariable(name.to_string()))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

pub fn simple_bot_prompt() -> Result<ChatPromptTemplate, PromptError> {
    ChatPromptTemplate::from_messages(&[("system", SIMPLE_BOT_SYSTEM_PROMPT), ("user", "{input}")])
}

pub fn rag_prompt() -> Result<ChatPromptTemplate, PromptError> {
    ChatPromptTemplate::from_messages(&[("human", RAG_PROMPT_TEMPLATE)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_bot_prompt_fills_input() {
        let vars = HashMap::from([("input", "1919년에 무슨 일이 있었나요?".to_string())]);
        let messages = simple_bot_prompt().unwrap().format(&vars).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(SIMPLE_BOT_SYSTEM_PROMPT));
        assert_eq!(messages[1].content, "1919년에 무슨 일이 있었나요?");
    }

    #[test]
    fn braces_in_values_are_not_expanded() {
        let vars = HashMap::from([("input", "{context}".to_string())]);
        let messages = simple_bot_prompt().unwrap().format(&vars).unwrap();
        assert_eq!(messages[1].content, "{context}");
    }

    #[test]
    fn missing_variable_is_an_error() {
        let err = rag_prompt()
            .unwrap()
            .format(&HashMap::from([("question", "q".to_string())]))
            .unwrap_err();
        assert_eq!(err, PromptError::MissingVariable("context".to_string()));
    }

    #[test]
    fn rag_prompt_places_question_and_context() {
        let vars = HashMap::from([
            ("question", "How do I reset it?".to_string()),
            ("context", "Hold the button for 5 seconds.".to_string()),
        ]);
        let messages = rag_prompt().unwrap().format(&vars).unwrap();
        let content = &messages[0].content;

        assert!(content.contains("Question: How do I reset it? \n"));
        assert!(content.contains("Context: Hold the button for 5 seconds. \n"));
        assert!(content.ends_with("Answer:"));
    }

    #[test]
    fn from_messages_rejects_unknown_roles() {
        let err = ChatPromptTemplate::from_messages(&[("narrator", "x")]).unwrap_err();
        assert_eq!(err, PromptError::UnknownRole("narrator".to_string()));
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        let template = ChatPromptTemplate::from_messages(&[("user", "hello {name")]).unwrap();
        assert!(matches!(
            template.format(&HashMap::new()),
            Err(PromptError::UnclosedPlaceholder(_))
        ));
    }
}
