pub mod config;
pub mod errors;
pub mod llm;
pub mod messages;
pub mod models;
pub mod service;
pub mod tasks;
pub mod telemetry;

pub use config::Settings;
pub use errors::TaskError;
pub use llm::{ChatModel, ChatRequest, ModelProfile, OpenRouterChatModel};
pub use models::*;
pub use service::{AppState, build_router, create_app};
