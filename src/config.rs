use std::{env, path::PathBuf};
use secrecy::SecretString;

pub const DEFAULT_LLM_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_LLM_MODEL_NAME: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 100_000;
pub const DEFAULT_MAX_QUESTIONS: usize = 20;

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm_api_key: SecretString,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub max_upload_bytes: usize,
    pub max_content_chars: usize,
    pub max_questions: usize,
    pub upload_dir: PathBuf,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_var("WEB_SERVER_PORT").unwrap_or(3000),
            llm_api_key: SecretString::from(env::var("LLM_API_KEY").unwrap_or_default()),
            llm_api_base_url: env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_API_BASE_URL.to_string()),
            llm_model_name: env::var("LLM_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_LLM_MODEL_NAME.to_string()),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            max_content_chars: parse_var("MAX_CONTENT_CHARS")
                .unwrap_or(DEFAULT_MAX_CONTENT_CHARS),
            max_questions: parse_var("MAX_QUESTIONS").unwrap_or(DEFAULT_MAX_QUESTIONS),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if the language model API key is missing
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.llm_api_key.expose_secret().trim().is_empty() {
            panic!(
                "FATAL: LLM_API_KEY is not set! Set LLM_API_KEY to the generative language API key."
            );
        }

        if self.max_content_chars == 0 {
            panic!("FATAL: MAX_CONTENT_CHARS must be greater than zero.");
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 3000,
            llm_api_key: SecretString::from("test-api-key".to_string()),
            llm_api_base_url: "http://localhost:9999/v1".to_string(),
            llm_model_name: "test-model".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            max_questions: DEFAULT_MAX_QUESTIONS,
            upload_dir: env::temp_dir(),
            cors_allowed_origin: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
