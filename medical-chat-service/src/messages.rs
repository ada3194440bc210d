//! User-facing texts produced by the service layer itself.

use hmo_intake::{Language, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMessage {
    InfoCollected,
    ValidationErrorsFound,
    ProcessingError,
    LlmConnectionError,
    InvalidUserInfo,
    ContextLoadError,
    EmptyMessage,
}

impl ServiceMessage {
    pub fn text(self, lang: Language) -> &'static str {
        use ServiceMessage::*;
        match (self, lang) {
            (InfoCollected, Language::Hebrew) => {
                "תודה! כל הפרטים נאספו ואומתו. כעת אפשר לשאול על השירותים הרפואיים הזמינים לך."
            }
            (InfoCollected, Language::English) => {
                "Thank you! All your details were collected and verified. You can now ask about the medical services available to you."
            }
            (ValidationErrorsFound, Language::Hebrew) => "נמצאו שגיאות באימות הנתונים:",
            (ValidationErrorsFound, Language::English) => "Validation errors found:",
            (ProcessingError, Language::Hebrew) => {
                "אירעה שגיאה בעיבוד הנתונים. אנא נסה שוב."
            }
            (ProcessingError, Language::English) => {
                "There was an error processing your information. Please try again."
            }
            (LlmConnectionError, Language::Hebrew) => {
                "שגיאה בחיבור לשירות הבינה המלאכותית. אנא נסה שוב מאוחר יותר."
            }
            (LlmConnectionError, Language::English) => {
                "Error connecting to the AI service. Please try again later."
            }
            (InvalidUserInfo, Language::Hebrew) => "פרטי המשתמש אינם תקינים.",
            (InvalidUserInfo, Language::English) => "The user information is invalid.",
            (ContextLoadError, Language::Hebrew) => {
                "לא נמצא מידע רפואי עבור קופת החולים ודרג החברות שלך."
            }
            (ContextLoadError, Language::English) => {
                "No medical information was found for your HMO and membership tier."
            }
            (EmptyMessage, Language::Hebrew) => "ההודעה אינה יכולה להיות ריקה.",
            (EmptyMessage, Language::English) => "The message cannot be empty.",
        }
    }
}

/// Localized header followed by one line per failed field.
pub fn validation_errors_reply(verdict: &Verdict, lang: Language) -> String {
    let mut reply = ServiceMessage::ValidationErrorsFound.text(lang).to_string();
    for message in verdict.field_errors.values() {
        reply.push_str("\n- ");
        reply.push_str(message);
    }
    reply
}
