use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/forms.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_STATIC_DIR: &str = "./public";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    pub static_dir: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub generation_timeout: Duration,
    /// Re-check required questions server-side on public submissions.
    pub enforce_required_answers: bool,
    pub seed_user: Option<(String, String)>,
    pub reset_token_in_response: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_key: None,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            enforce_required_answers: true,
            seed_user: None,
            reset_token_in_response: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Failed to load .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let generation_timeout = match get("GENERATION_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!("Invalid GENERATION_TIMEOUT_SECS '{raw}', using default");
                    defaults.generation_timeout
                }
            },
            None => defaults.generation_timeout,
        };

        let seed_user = match (get("SEED_USER_EMAIL"), get("SEED_USER_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            session_key: get("SESSION_KEY"),
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            generation_timeout,
            enforce_required_answers: parse_flag(
                "ENFORCE_REQUIRED_ANSWERS",
                get("ENFORCE_REQUIRED_ANSWERS"),
                defaults.enforce_required_answers,
            ),
            seed_user,
            reset_token_in_response: parse_flag(
                "RESET_TOKEN_IN_RESPONSE",
                get("RESET_TOKEN_IN_RESPONSE"),
                defaults.reset_token_in_response,
            ),
        }
    }
}

fn parse_flag(name: &str, raw: Option<String>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            log::warn!("Invalid {name} '{raw}', using default ({default})");
            default
        }
    }
}
