use std::sync::Arc;

use async_trait::async_trait;
use hmo_intake::{
    Language, ParsedPayload, PayloadStatus, RawValue, detect_language, extend_history,
    parse_model_output, user_info_collection_prompt, validate_user_info,
};
use tracing::{error, info, warn};

use crate::errors::TaskError;
use crate::llm::{ChatModel, ChatRequest, ModelProfile};
use crate::messages::{ServiceMessage, validation_errors_reply};
use crate::models::{UserInfoCollectionRequest, UserInfoCollectionResponse};

use super::ChatTask;

/// Drives the intake conversation until the model reports a complete,
/// valid record.
pub struct UserInfoCollectionTask {
    model: Arc<dyn ChatModel>,
    profile: ModelProfile,
    default_language: Language,
}

impl UserInfoCollectionTask {
    pub fn new(
        model: Arc<dyn ChatModel>,
        profile: ModelProfile,
        default_language: Language,
    ) -> Self {
        Self {
            model,
            profile,
            default_language,
        }
    }

    /// Apply the aggregate validator to a completed payload.
    fn finish(
        &self,
        payload: ParsedPayload,
        lang: Language,
    ) -> (UserInfoCollectionResponse, String) {
        let ParsedPayload {
            response,
            collected_fields,
            user_info,
            ..
        } = payload;

        let Some(raw_info) = user_info else {
            warn!(task_id = %self.id(), "Model reported completion without user_info");
            return self.error_response(lang);
        };

        let verdict = validate_user_info(&raw_info, lang);
        if !verdict.is_valid {
            let failed: Vec<&str> = verdict.failed_fields().iter().map(|f| f.key()).collect();
            warn!(
                task_id = %self.id(),
                failed_fields = ?failed,
                user_hmo = ?raw_info.hmo_name.as_ref().map(RawValue::to_text),
                user_tier = ?raw_info.membership_tier.as_ref().map(RawValue::to_text),
                "User info validation failed"
            );
            let reply = validation_errors_reply(&verdict, lang);
            let response = UserInfoCollectionResponse {
                status: PayloadStatus::Collecting,
                response: reply.clone(),
                collected_fields,
                missing_fields: failed.iter().map(|key| key.to_string()).collect(),
                user_info: None,
                conversation_history: Vec::new(),
            };
            return (response, reply);
        }

        let Some(user_info) = verdict.user_info() else {
            error!(task_id = %self.id(), "Valid verdict did not yield a typed record");
            return self.error_response(lang);
        };

        info!(
            task_id = %self.id(),
            user_hmo = %user_info.hmo_name,
            user_tier = %user_info.membership_tier,
            "User info validation successful"
        );

        let reply = response
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| ServiceMessage::InfoCollected.text(lang).to_string());
        let response = UserInfoCollectionResponse {
            status: PayloadStatus::Completed,
            response: reply.clone(),
            collected_fields,
            missing_fields: Vec::new(),
            user_info: Some(user_info),
            conversation_history: Vec::new(),
        };
        (response, reply)
    }

    fn error_response(&self, lang: Language) -> (UserInfoCollectionResponse, String) {
        let reply = ServiceMessage::ProcessingError.text(lang).to_string();
        let response = UserInfoCollectionResponse {
            status: PayloadStatus::Error,
            response: reply.clone(),
            collected_fields: Vec::new(),
            missing_fields: Vec::new(),
            user_info: None,
            conversation_history: Vec::new(),
        };
        (response, reply)
    }
}

#[async_trait]
impl ChatTask for UserInfoCollectionTask {
    type Request = UserInfoCollectionRequest;
    type Response = UserInfoCollectionResponse;

    async fn run(
        &self,
        request: UserInfoCollectionRequest,
    ) -> Result<UserInfoCollectionResponse, TaskError> {
        let lang = detect_language(&request.message, self.default_language);
        if request.message.trim().is_empty() {
            return Err(TaskError::EmptyMessage { lang });
        }

        info!(
            task_id = %self.id(),
            language = %lang,
            history_len = request.conversation_history.len(),
            "Starting user info collection turn"
        );

        let raw_reply = self
            .model
            .chat(ChatRequest {
                system_prompt: user_info_collection_prompt(lang),
                history: &request.conversation_history,
                user_message: &request.message,
                profile: &self.profile,
            })
            .await
            .map_err(|e| {
                error!(task_id = %self.id(), error = %e, "LLM call failed");
                TaskError::Llm {
                    lang,
                    detail: e.to_string(),
                }
            })?;

        let payload = parse_model_output(&raw_reply);

        let (mut response, reply) = match payload.status {
            PayloadStatus::Completed => self.finish(payload, lang),
            status => {
                let reply = payload.response.unwrap_or_else(|| raw_reply.clone());
                let response = UserInfoCollectionResponse {
                    status,
                    response: reply.clone(),
                    collected_fields: payload.collected_fields,
                    missing_fields: payload.missing_fields,
                    user_info: None,
                    conversation_history: Vec::new(),
                };
                (response, reply)
            }
        };

        response.conversation_history =
            extend_history(&request.conversation_history, &request.message, &reply);

        info!(
            task_id = %self.id(),
            status = ?response.status,
            collected = response.collected_fields.len(),
            missing = response.missing_fields.len(),
            "User info collection turn finished"
        );

        Ok(response)
    }
}
