use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware::from_fn,
    response::Json,
    routing::{get, post},
};
use hmo_intake::{ContextSource, FileContextLoader};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::{
    config::Settings,
    errors::TaskError,
    llm::{ChatModel, OpenRouterChatModel},
    models::{
        HealthResponse, MedicalQaRequest, MedicalQaResponse, UserInfoCollectionRequest,
        UserInfoCollectionResponse,
    },
    tasks::{ChatTask, MedicalQaTask, UserInfoCollectionTask},
    telemetry::correlation_id_middleware,
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
            "status_code": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}

fn task_error(err: TaskError) -> ApiError {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, status = status.as_u16(), "Request failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "Request rejected");
    }
    error_response(status, err.user_message())
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub chat_model: Arc<dyn ChatModel>,
    pub contexts: Arc<dyn ContextSource>,
    user_info_task: Arc<UserInfoCollectionTask>,
    medical_qa_task: Arc<MedicalQaTask>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        chat_model: Arc<dyn ChatModel>,
        contexts: Arc<dyn ContextSource>,
    ) -> Self {
        let user_info_task = Arc::new(UserInfoCollectionTask::new(
            chat_model.clone(),
            settings.user_info_profile.clone(),
            settings.default_language,
        ));
        let medical_qa_task = Arc::new(MedicalQaTask::new(
            chat_model.clone(),
            contexts.clone(),
            settings.medical_qa_profile.clone(),
            settings.default_language,
        ));

        Self {
            settings: Arc::new(settings),
            chat_model,
            contexts,
            user_info_task,
            medical_qa_task,
        }
    }
}

/// Router wired to OpenRouter and the on-disk context folder.
pub fn create_app(settings: Settings) -> Router {
    let chat_model = Arc::new(OpenRouterChatModel::new(settings.openrouter_api_key.clone()));
    let contexts = Arc::new(FileContextLoader::new(settings.data_folder.clone()));
    build_router(AppState::new(settings, chat_model, contexts))
}

pub fn build_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.settings.allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/favicon.ico", get(favicon))
        .route("/api/v1/user-info-collection", post(collect_user_info))
        .route("/api/v1/medical-qa", post(answer_medical_question))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "HMO Medical Chatbot",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Bilingual (Hebrew/English) assistant for Israeli HMO medical services",
        "endpoints": {
            "POST /api/v1/user-info-collection": "Collect and validate user details",
            "POST /api/v1/medical-qa": "Ask about medical services for a verified user",
            "GET /api/v1/health": "Health check"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        llm_configured: state.chat_model.is_configured(),
        available_contexts: state.contexts.available().await,
    })
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn collect_user_info(
    State(state): State<AppState>,
    Json(request): Json<UserInfoCollectionRequest>,
) -> ApiResult<UserInfoCollectionResponse> {
    let response = state
        .user_info_task
        .run(request)
        .await
        .map_err(task_error)?;
    Ok(Json(response))
}

async fn answer_medical_question(
    State(state): State<AppState>,
    Json(request): Json<MedicalQaRequest>,
) -> ApiResult<MedicalQaResponse> {
    let response = state
        .medical_qa_task
        .run(request)
        .await
        .map_err(task_error)?;
    Ok(Json(response))
}
