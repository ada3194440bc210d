use std::sync::Arc;

use async_trait::async_trait;
use hmo_intake::{
    ContextSource, Language, RawUserInfo, build_medical_qa_prompt, detect_language,
    extend_history, validate_user_info,
};
use tracing::{error, info, warn};

use crate::errors::TaskError;
use crate::llm::{ChatModel, ChatRequest, ModelProfile};
use crate::models::{MedicalQaRequest, MedicalQaResponse, QaStatus};

use super::ChatTask;

/// Answers questions about the services available to a verified user.
pub struct MedicalQaTask {
    model: Arc<dyn ChatModel>,
    contexts: Arc<dyn ContextSource>,
    profile: ModelProfile,
    default_language: Language,
}

impl MedicalQaTask {
    pub fn new(
        model: Arc<dyn ChatModel>,
        contexts: Arc<dyn ContextSource>,
        profile: ModelProfile,
        default_language: Language,
    ) -> Self {
        Self {
            model,
            contexts,
            profile,
            default_language,
        }
    }
}

#[async_trait]
impl ChatTask for MedicalQaTask {
    type Request = MedicalQaRequest;
    type Response = MedicalQaResponse;

    async fn run(&self, request: MedicalQaRequest) -> Result<MedicalQaResponse, TaskError> {
        let lang = detect_language(&request.message, self.default_language);
        if request.message.trim().is_empty() {
            return Err(TaskError::EmptyMessage { lang });
        }

        // the record arrives from the client, so it is checked again here
        let verdict = validate_user_info(&RawUserInfo::from(&request.user_info), lang);
        let Some(user) = verdict.user_info() else {
            let fields = verdict.failed_fields();
            warn!(
                task_id = %self.id(),
                failed_fields = ?fields.iter().map(|f| f.key()).collect::<Vec<_>>(),
                "Rejected medical question with invalid user info"
            );
            return Err(TaskError::InvalidUserInfo { lang, fields });
        };

        info!(
            task_id = %self.id(),
            language = %lang,
            user_hmo = %user.hmo_name,
            user_tier = %user.membership_tier,
            "Starting medical Q&A turn"
        );

        let context = self
            .contexts
            .load(user.hmo_name, user.membership_tier)
            .await
            .map_err(|source| {
                error!(task_id = %self.id(), error = %source, "Failed to load medical context");
                TaskError::Context { lang, source }
            })?;

        let system_prompt = build_medical_qa_prompt(&user, &context, lang);
        let answer = self
            .model
            .chat(ChatRequest {
                system_prompt: &system_prompt,
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

        info!(
            task_id = %self.id(),
            answer_len = answer.chars().count(),
            "Medical Q&A turn finished"
        );

        let conversation_history =
            extend_history(&request.conversation_history, &request.message, &answer);

        Ok(MedicalQaResponse {
            status: QaStatus::Success,
            response: answer,
            conversation_history,
        })
    }
}
