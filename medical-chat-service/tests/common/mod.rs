//! Shared harness: the full router over a scripted model and a temporary
//! context folder.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use hmo_intake::FileContextLoader;
use medical_chat_service::{AppState, ChatModel, ChatRequest, Settings, build_router};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Replies with a fixed script and records every request it sees.
pub struct ScriptedModel {
    reply: Mutex<Result<String, String>>,
    pub seen: Mutex<Vec<SeenRequest>>,
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub history_len: usize,
    pub model: String,
}

impl ScriptedModel {
    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = Ok(reply.to_string());
    }

    pub fn set_failure(&self, error: &str) {
        *self.reply.lock().unwrap() = Err(error.to_string());
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(SeenRequest {
            system_prompt: request.system_prompt.to_string(),
            user_message: request.user_message.to_string(),
            history_len: request.history.len(),
            model: request.profile.model.clone(),
        });
        self.reply
            .lock()
            .unwrap()
            .clone()
            .map_err(|e| anyhow::anyhow!(e))
    }

    fn is_configured(&self) -> bool {
        false
    }
}

pub struct TestApp {
    pub router: Router,
    pub model: Arc<ScriptedModel>,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn spawn() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Settings::from_lookup(|_| None).expect("default settings");
        let model = Arc::new(ScriptedModel {
            reply: Mutex::new(Ok(String::new())),
            seen: Mutex::new(Vec::new()),
        });
        let contexts = Arc::new(FileContextLoader::new(data_dir.path()));
        let router = build_router(AppState::new(settings, model.clone(), contexts));

        Self {
            router,
            model,
            data_dir,
        }
    }

    pub fn write_context(&self, file_name: &str, text: &str) {
        std::fs::write(self.data_dir.path().join(file_name), text)
            .expect("Failed to write context file");
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}
