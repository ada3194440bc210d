use medical_chat_service::{Settings, create_app, telemetry::init_tracing};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    if settings.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY not set; chat endpoints will answer with 502");
    }
    if !settings.data_folder.is_dir() {
        warn!(
            folder = %settings.data_folder.display(),
            "Data folder does not exist; run knowledge-prep to generate medical contexts"
        );
    }

    let listener = TcpListener::bind(settings.bind_address()).await?;
    let addr = listener.local_addr()?;

    info!(
        default_language = %settings.default_language,
        user_info_model = %settings.user_info_profile.model,
        medical_qa_model = %settings.medical_qa_profile.model,
        "HMO medical chatbot starting on {}",
        addr
    );
    info!("Health check endpoint: http://{}/api/v1/health", addr);

    let app = create_app(settings);
    axum::serve(listener, app).await?;

    Ok(())
}
