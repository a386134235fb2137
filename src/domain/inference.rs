use serde::{Deserialize, Serialize};

/// Answer from the table question-answering provider.
///
/// Confidence is advisory only: it is logged when low, never used to
/// reject an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAnswer {
    pub answer: String,
    pub confidence: Option<f64>,
}

/// Single reply from a chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
}

/// One turn of a chat-completions payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
