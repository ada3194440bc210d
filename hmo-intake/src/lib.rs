pub mod chat;
pub mod context_loader;
pub mod error;
pub mod hmo;
pub mod language;
pub mod localization;
pub mod normalize;
pub mod prompts;
pub mod response_parser;
pub mod user_info;
pub mod validators;

// Re-export commonly used types
pub use chat::{ChatMessage, MessageRole, extend_history};
pub use context_loader::{ContextSource, FileContextLoader, is_supported_context};
pub use error::{ContextError, Result};
pub use hmo::{Hmo, MembershipTier};
pub use language::{Language, detect_language};
pub use localization::Message;
pub use prompts::{build_medical_qa_prompt, user_info_collection_prompt};
pub use response_parser::{ParsedPayload, PayloadStatus, parse_model_output};
pub use user_info::{RawUserInfo, RawValue, UserField, UserInfo, Verdict, validate_user_info};
