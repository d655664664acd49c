use std::env;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub openai_api_key: SecretString,
    pub openai_api_base: Option<String>,
    pub openai_model: String,
    pub frame_analyzer_url: Option<String>,
    pub assessment_duration_secs: u32,
    pub assessment_question_count: usize,
    pub frame_sample_interval_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: env_or("MONGO_DB_NAME", "blox-talent-local"),
            web_server_host: env_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env_parse_or("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: env_or("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            openai_api_key: SecretString::from(env_or("OPENAI_API_KEY", "")),
            openai_api_base: env_optional("OPENAI_API_BASE"),
            openai_model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            frame_analyzer_url: env_optional("FRAME_ANALYZER_URL"),
            assessment_duration_secs: env_parse_or("ASSESSMENT_DURATION_SECS", 3600),
            assessment_question_count: env_parse_or("ASSESSMENT_QUESTION_COUNT", 10),
            frame_sample_interval_secs: env_parse_or("FRAME_SAMPLE_INTERVAL_SECS", 5),
        }
    }

    /// Rejects configuration that would leave the service unusable.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "OPENAI_API_KEY must be set; question sets and generators depend on it".to_string(),
            ));
        }

        if self.assessment_duration_secs == 0 {
            return Err(AppError::ValidationError(
                "ASSESSMENT_DURATION_SECS must be greater than zero".to_string(),
            ));
        }

        if self.assessment_question_count == 0 {
            return Err(AppError::ValidationError(
                "ASSESSMENT_QUESTION_COUNT must be greater than zero".to_string(),
            ));
        }

        if self.frame_sample_interval_secs == 0 {
            return Err(AppError::ValidationError(
                "FRAME_SAMPLE_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        if self.frame_analyzer_url.is_none() {
            log::warn!("FRAME_ANALYZER_URL not set; proctoring frames will not be analyzed");
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "blox-talent-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            openai_api_key: SecretString::from("sk-test".to_string()),
            openai_api_base: None,
            openai_model: "gpt-4o-mini".to_string(),
            frame_analyzer_url: None,
            assessment_duration_secs: 3600,
            assessment_question_count: 10,
            frame_sample_interval_secs: 5,
        }
    }
}
