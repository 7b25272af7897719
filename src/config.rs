//! Process-wide settings, read once at startup.
//!
//! Required: `GROQ_API_KEY`
//! Optional: `GROQ_URL`, `COACH_MODEL`, `COACH_TEMPERATURE`,
//! `COACH_MAX_TOKENS`, `COACH_TIMEOUT_SECS`, `COACH_SYSTEM_PROMPT`,
//! `COACH_STATIC_DIR`, `PORT`

use std::{env, fmt, str::FromStr, time::Duration};

use crate::error::ConfigError;
use crate::prompt::SYSTEM_PROMPT;

pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Fixed model configuration sent with every completion.
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub system_prompt: String,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_GROQ_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 300,
            timeout: Duration::from_secs(8),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub completion: CompletionConfig,
    pub static_dir: String,
    pub port: u16,
}

impl Settings {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("GROQ_API_KEY"))?;

        let mut completion = CompletionConfig::new(api_key);
        if let Ok(url) = env::var("GROQ_URL") {
            completion.url = url;
        }
        if let Ok(model) = env::var("COACH_MODEL") {
            completion.model = model;
        }
        if let Ok(prompt) = env::var("COACH_SYSTEM_PROMPT") {
            completion.system_prompt = prompt;
        }
        completion.temperature = parse_var("COACH_TEMPERATURE", completion.temperature)?;
        completion.max_tokens = parse_var("COACH_MAX_TOKENS", completion.max_tokens)?;
        let timeout_secs: u64 = parse_var("COACH_TIMEOUT_SECS", 8)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "COACH_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        completion.timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            completion,
            static_dir: env::var("COACH_STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
            port: parse_var("PORT", 8000)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
