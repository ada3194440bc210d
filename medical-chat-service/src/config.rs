use std::fmt;
use std::path::PathBuf;

use anyhow::Context as _;
use hmo_intake::Language;

use crate::llm::ModelProfile;
use crate::telemetry::LogFormat;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:8501"];

/// Runtime settings, read once at startup from the environment.
#[derive(Clone)]
pub struct Settings {
    pub openrouter_api_key: Option<String>,
    pub user_info_profile: ModelProfile,
    pub medical_qa_profile: ModelProfile,
    pub host: String,
    pub port: u16,
    pub data_folder: PathBuf,
    pub default_language: Language,
    pub log_format: LogFormat,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let user_info_profile = ModelProfile {
            model: get_or("COLLECTION_MODEL", "openai/gpt-4o-mini"),
            temperature: parse_or(get("USER_INFO_TEMPERATURE"), "USER_INFO_TEMPERATURE", 0.3)?,
            max_tokens: parse_or(get("USER_INFO_MAX_TOKENS"), "USER_INFO_MAX_TOKENS", 1500)?,
        };
        let medical_qa_profile = ModelProfile {
            model: get_or("MEDICAL_QA_MODEL", "openai/gpt-4o"),
            temperature: parse_or(get("MEDICAL_QA_TEMPERATURE"), "MEDICAL_QA_TEMPERATURE", 0.1)?,
            max_tokens: parse_or(get("MEDICAL_QA_MAX_TOKENS"), "MEDICAL_QA_MAX_TOKENS", 8000)?,
        };

        let default_language = get_or("DEFAULT_LANGUAGE", "he")
            .parse::<Language>()
            .context("invalid DEFAULT_LANGUAGE")?;

        let allowed_origins = match get("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            user_info_profile,
            medical_qa_profile,
            host: get_or("APP_HOST", "0.0.0.0"),
            port: parse_or(get("APP_PORT"), "APP_PORT", 8000)?,
            data_folder: PathBuf::from(get_or("DATA_FOLDER", "user_specific_data")),
            default_language,
            log_format: LogFormat::from_name(&get_or("LOG_FORMAT", "json")),
            allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// The API key is deliberately left out.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("llm_configured", &self.openrouter_api_key.is_some())
            .field("user_info_profile", &self.user_info_profile)
            .field("medical_qa_profile", &self.medical_qa_profile)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_folder", &self.data_folder)
            .field("default_language", &self.default_language)
            .field("log_format", &self.log_format)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
