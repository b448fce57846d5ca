//! Environment-variable configuration, validated once at startup.
//!
//! `DATABASE_URL` and `AUTH_SECRET` are required; everything else has a
//! default or is optional. `AppConfig::from_env` reports every missing
//! required variable at once so an operator can fix them in one pass.

use std::env;
use std::fmt;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

/// Settings for the hosted completion API. Absent entirely when no API key is
/// configured; the AI endpoints then fail fast with a configuration error.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// HMAC key for session and magic-link tokens.
    pub auth_secret: Vec<u8>,
    pub bind_addr: String,
    /// Origin allowed by the CORS layer, if any.
    pub cors_origin: Option<String>,
    pub openai: Option<OpenAiConfig>,
}

/// Missing required environment variables, listed by name.
#[derive(Debug)]
pub struct MissingEnv(pub Vec<&'static str>);

impl fmt::Display for MissingEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required environment variables: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingEnv {}

impl AppConfig {
    pub fn from_env() -> Result<Self, MissingEnv> {
        let mut missing = Vec::new();

        let database_url = require("DATABASE_URL", &mut missing);
        let auth_secret = require("AUTH_SECRET", &mut missing);

        if !missing.is_empty() {
            return Err(MissingEnv(missing));
        }

        let openai = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|api_key| OpenAiConfig {
                api_key,
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            });

        Ok(Self {
            database_url,
            auth_secret: auth_secret.into_bytes(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            openai,
        })
    }

    /// Fixed configuration for unit and integration tests.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            auth_secret: b"test-secret-not-for-production".to_vec(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_origin: None,
            openai: None,
        }
    }
}

fn require(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}
