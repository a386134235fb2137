use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::HttpTransport;
use crate::domain::error::InferenceError;
use crate::domain::inference::{ChatMessage, ChatReply, TableAnswer};
use crate::domain::table::Table;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const CHAT_MAX_TOKENS: u32 = 1000;
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Endpoints for the remote inference providers.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub table_qa: String,
    pub chat: String,
    pub chat_completions: String,
}

/// Mediates request/response translation with the remote inference
/// providers: builds provider-specific payloads, sends them through the
/// injected transport, and maps responses into domain results or a
/// categorized [`InferenceError`].
///
/// The two chat operations use deliberately different payload/response
/// schemas and are not interchangeable; see [`chat`](Self::chat) and
/// [`chat_completions`](Self::chat_completions).
pub struct InferenceGateway {
    transport: Arc<dyn HttpTransport>,
    credential: String,
    endpoints: ProviderEndpoints,
}

impl InferenceGateway {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credential: String,
        endpoints: ProviderEndpoints,
    ) -> Self {
        Self {
            transport,
            credential,
            endpoints,
        }
    }

    /// Ask the table-QA provider a question about a parsed table.
    ///
    /// A sub-0.5 confidence is logged as a diagnostic signal only; the
    /// answer is returned unchanged either way.
    pub async fn analyze_table(
        &self,
        table: &Table,
        question: &str,
    ) -> Result<TableAnswer, InferenceError> {
        if table.is_empty() {
            return Err(InferenceError::EmptyTable);
        }

        let payload = json!({
            "inputs": {
                "table": table,
                "query": question,
            }
        });
        let body = self.post(&self.endpoints.table_qa, &payload).await?;

        let answer = body
            .get("answer")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                InferenceError::InvalidResponseShape(
                    "missing string `answer` field".to_string(),
                )
            })?
            .to_string();

        // Missing or wrong-typed confidence counts as zero, not an error.
        let confidence = body.get("confidence").and_then(Value::as_f64);
        if confidence.unwrap_or(0.0) < LOW_CONFIDENCE_THRESHOLD {
            warn!(
                confidence = confidence.unwrap_or(0.0),
                "table-QA answer below confidence threshold"
            );
        }

        Ok(TableAnswer { answer, confidence })
    }

    /// Chat through the context/query provider contract: the provider
    /// returns an ordered sequence of responses and the first element is
    /// canonical.
    pub async fn chat(&self, context: &str, query: &str) -> Result<ChatReply, InferenceError> {
        let payload = json!({
            "context": context,
            "query": query,
        });
        let body = self.post(&self.endpoints.chat, &payload).await?;

        let replies = body.as_array().ok_or_else(|| {
            InferenceError::InvalidResponseShape("expected an array of responses".to_string())
        })?;
        let first = replies.first().ok_or(InferenceError::NoResponses)?;
        let content = first
            .get("answer")
            .or_else(|| first.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                InferenceError::InvalidResponseShape(
                    "response element lacks an answer field".to_string(),
                )
            })?;

        Ok(ChatReply {
            content: content.to_string(),
        })
    }

    /// Chat through the chat-completions provider contract: a `messages`
    /// array in, `choices[0].message.content` out.
    pub async fn chat_completions(&self, query: &str) -> Result<ChatReply, InferenceError> {
        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];
        let payload = json!({
            "messages": messages,
            "max_tokens": CHAT_MAX_TOKENS,
        });
        let body = self.post(&self.endpoints.chat_completions, &payload).await?;

        let choices = body.get("choices").and_then(Value::as_array).ok_or_else(|| {
            InferenceError::InvalidResponseShape("missing `choices` array".to_string())
        })?;
        let first = choices.first().ok_or(InferenceError::NoResponses)?;
        let content = first
            .pointer("/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                InferenceError::InvalidResponseShape(
                    "choice lacks a message content field".to_string(),
                )
            })?;

        Ok(ChatReply {
            content: content.to_string(),
        })
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value, InferenceError> {
        let reply = self
            .transport
            .post_json(url, &self.credential, payload)
            .await?;
        if !reply.is_success() {
            return Err(InferenceError::Provider {
                status: reply.status,
                body: reply.body,
            });
        }
        serde_json::from_str(&reply.body).map_err(|e| InferenceError::Decode(e.to_string()))
    }
}
