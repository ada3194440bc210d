use hmo_intake::{ChatMessage, PayloadStatus, UserInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserInfoCollectionRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserInfoCollectionResponse {
    pub status: PayloadStatus,
    pub response: String,
    #[serde(default)]
    pub collected_fields: Vec<String>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MedicalQaRequest {
    pub message: String,
    pub user_info: UserInfo,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QaStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MedicalQaResponse {
    pub status: QaStatus,
    pub response: String,
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub llm_configured: bool,
    pub available_contexts: Vec<String>,
}
