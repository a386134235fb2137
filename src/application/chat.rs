use std::sync::Arc;

use crate::domain::error::InferenceError;
use crate::domain::inference::ChatReply;
use crate::infrastructure::llm_clients::gateway::InferenceGateway;

/// Chat path: forward a freeform query to the chat-completions provider.
pub struct ChatUseCase {
    gateway: Arc<InferenceGateway>,
}

impl ChatUseCase {
    pub fn new(gateway: Arc<InferenceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, query: &str) -> Result<ChatReply, InferenceError> {
        self.gateway.chat_completions(query).await
    }
}
