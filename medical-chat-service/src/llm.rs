//! The LLM collaborator: "answer this user message given a system prompt
//! and the conversation so far".

use async_trait::async_trait;
use hmo_intake::{ChatMessage, MessageRole};
use rig::completion::{Chat, Message};

use crate::tasks::utils::get_llm_agent;

/// Model and sampling parameters for one conversation phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProfile {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

/// Everything needed for one completion call.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub system_prompt: &'a str,
    pub history: &'a [ChatMessage],
    pub user_message: &'a str,
    pub profile: &'a ModelProfile,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Assistant reply for the request.
    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<String>;

    /// Whether credentials are present.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Convert a history message to the rig representation
pub fn to_rig_message(msg: &ChatMessage) -> Message {
    match msg.role {
        MessageRole::User => Message::user(msg.content.clone()),
        MessageRole::Assistant => Message::assistant(msg.content.clone()),
        // rig has no system role inside the history, so prefix it
        MessageRole::System => Message::user(format!("[SYSTEM] {}", msg.content)),
    }
}

pub fn to_rig_messages(messages: &[ChatMessage]) -> Vec<Message> {
    messages
        .iter()
        .filter(|msg| !msg.content.trim().is_empty())
        .map(to_rig_message)
        .collect()
}

/// [`ChatModel`] backed by OpenRouter through rig.
pub struct OpenRouterChatModel {
    api_key: Option<String>,
}

impl OpenRouterChatModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl ChatModel for OpenRouterChatModel {
    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OPENROUTER_API_KEY not set"))?;

        let agent = get_llm_agent(api_key, request.system_prompt, request.profile);
        let history = to_rig_messages(request.history);

        let response = agent.chat(request.user_message, history).await?;
        Ok(response)
    }

    fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
