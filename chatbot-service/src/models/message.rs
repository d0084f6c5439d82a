//! Chat messages exchanged between the browser client and the bots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nick name attached to every bot reply in member chats.
pub const BOT_NICK_NAME: &str = "bot";

/// Reply text used when a member chat fails.
pub const NOT_FOUND_MESSAGE: &str = "조회결과가 존재하지 않거나 조회에 실패했습니다.";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    User,
    Bot,
}

/// Which hosted model answers a mixbot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotType {
    LlmGpt,
    LlmGemini,
}

impl BotType {
    /// Parse the wire value sent by the client (`LLMGPT` / `LLMGEMINI`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LLMGPT" => Some(BotType::LlmGpt),
            "LLMGEMINI" => Some(BotType::LlmGemini),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub user_type: UserType,
    pub message: String,
    pub send_date: DateTime<Utc>,
}

impl Message {
    /// Bot reply stamped with the current time.
    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Bot,
            message: message.into(),
            send_date: Utc::now(),
        }
    }
}

/// A message with the display nick name of its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberMessage {
    pub user_type: UserType,
    pub nick_name: String,
    pub message: String,
    pub send_date: DateTime<Utc>,
}

impl MemberMessage {
    pub fn bot(message: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Bot,
            nick_name: BOT_NICK_NAME.to_string(),
            message: message.into(),
            send_date: Utc::now(),
        }
    }

    /// Fallback reply for member chats that failed.
    pub fn not_found() -> Self {
        Self::bot(NOT_FOUND_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_message_serializes_with_wire_names() {
        let msg = Message::bot("hello");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["user_type"], "Bot");
        assert_eq!(value["message"], "hello");
        assert!(value["send_date"].is_string());
    }

    #[test]
    fn member_bot_message_uses_bot_nick_name() {
        let msg = MemberMessage::bot("answer");
        assert_eq!(msg.nick_name, "bot");
        assert_eq!(msg.user_type, UserType::Bot);
    }

    #[test]
    fn not_found_message_text() {
        assert_eq!(MemberMessage::not_found().message, NOT_FOUND_MESSAGE);
    }

    #[test]
    fn send_date_is_taken_at_construction() {
        let before = Utc::now();
        let msg = Message::bot("x");
        let after = Utc::now();
        assert!(msg.send_date >= before && msg.send_date <= after);
    }

    #[test]
    fn bot_type_parses_known_values_only() {
        assert_eq!(BotType::parse("LLMGPT"), Some(BotType::LlmGpt));
        assert_eq!(BotType::parse("LLMGEMINI"), Some(BotType::LlmGemini));
        assert_eq!(BotType::parse("llmgpt"), None);
        assert_eq!(BotType::parse(""), None);
    }
}
