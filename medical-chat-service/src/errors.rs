use axum::http::StatusCode;
use hmo_intake::{ContextError, Language, UserField};
use thiserror::Error;

use crate::messages::ServiceMessage;

/// Failure of a conversation turn. Each variant remembers the language the
/// user wrote in so the HTTP layer can answer in kind.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("message is empty")]
    EmptyMessage { lang: Language },

    #[error("LLM request failed: {detail}")]
    Llm { lang: Language, detail: String },

    #[error("user info failed validation for: {}", field_keys(.fields))]
    InvalidUserInfo {
        lang: Language,
        fields: Vec<UserField>,
    },

    #[error("{source}")]
    Context {
        lang: Language,
        #[source]
        source: ContextError,
    },
}

fn field_keys(fields: &[UserField]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TaskError {
    pub fn language(&self) -> Language {
        match self {
            TaskError::EmptyMessage { lang }
            | TaskError::Llm { lang, .. }
            | TaskError::InvalidUserInfo { lang, .. }
            | TaskError::Context { lang, .. } => *lang,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskError::EmptyMessage { .. } | TaskError::InvalidUserInfo { .. } => {
                StatusCode::BAD_REQUEST
            }
            TaskError::Llm { .. } => StatusCode::BAD_GATEWAY,
            TaskError::Context {
                source: ContextError::NotFound { .. },
                ..
            } => StatusCode::BAD_REQUEST,
            TaskError::Context { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Localized text shown to the user.
    pub fn user_message(&self) -> &'static str {
        let message = match self {
            TaskError::EmptyMessage { .. } => ServiceMessage::EmptyMessage,
            TaskError::Llm { .. } => ServiceMessage::LlmConnectionError,
            TaskError::InvalidUserInfo { .. } => ServiceMessage::InvalidUserInfo,
            TaskError::Context { .. } => ServiceMessage::ContextLoadError,
        };
        message.text(self.language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmo_intake::{Hmo, MembershipTier};

    #[test]
    fn test_status_codes() {
        let lang = Language::English;
        assert_eq!(
            TaskError::EmptyMessage { lang }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskError::Llm {
                lang,
                detail: "timeout".into()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            TaskError::Context {
                lang,
                source: ContextError::NotFound {
                    hmo: Hmo::Maccabi,
                    tier: MembershipTier::Gold
                }
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaskError::Context {
                lang,
                source: ContextError::Io(std::io::Error::other("disk"))
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_names_failing_fields() {
        let err = TaskError::InvalidUserInfo {
            lang: Language::Hebrew,
            fields: vec![UserField::IdNumber, UserField::Age],
        };
        assert_eq!(
            err.to_string(),
            "user info failed validation for: id_number, age"
        );
        assert_eq!(err.user_message(), "פרטי המשתמש אינם תקינים.");
    }
}
