use std::path::PathBuf;

/// redpen runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion API credential; absence switches grading to the offline
    /// generator rather than failing.
    pub api_key: Option<String>,
    /// Completion endpoint URL
    pub api_url: String,
    /// Model requested from the endpoint
    pub model: String,
    /// Tesseract traineddata name
    pub ocr_language: String,
    /// Path of the persisted history file
    pub history_path: PathBuf,
    /// Bound on the grading HTTP call, in seconds
    pub http_timeout_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            ocr_language: "chi_tra".to_string(),
            history_path: default_history_path(),
            http_timeout_secs: 60,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("DEEPSEEK_API_KEY").ok().filter(|k| !k.is_empty()),
            api_url: std::env::var("DEEPSEEK_API_URL").unwrap_or(defaults.api_url),
            model: std::env::var("REDPEN_MODEL").unwrap_or(defaults.model),
            ocr_language: std::env::var("REDPEN_OCR_LANG").unwrap_or(defaults.ocr_language),
            history_path: std::env::var("REDPEN_HISTORY")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_path),
            http_timeout_secs: std::env::var("REDPEN_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("redpen")
        .join("history.json")
}
