// src/config/mod.rs
// All tunables load from the environment (with .env support); defaults are
// workable for local development.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // ── Server
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Chat provider (OpenAI-compatible)
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub chat_timeout: u64,

    // ── TTS provider (ElevenLabs)
    pub elevenlabs_api_key: String,
    pub elevenlabs_voice_id: String,
    pub tts_timeout: u64,

    // ── LMS bridge (Canvas)
    pub lms_timeout: u64,

    // ── Assistant session cache bounds
    pub assistant_history_cap: usize,
    pub assistant_session_cap: usize,

    // ── Logging
    pub log_level: String,
}

/// Parse an env var, tolerating trailing comments and whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        // .env is optional; plain environment variables always work.
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("VQ_HOST", "0.0.0.0".to_string()),
            port: env_var_or("VQ_PORT", 5000),
            cors_origin: env_var_or("VQ_CORS_ORIGIN", "*".to_string()),
            database_url: env_var_or(
                "DATABASE_URL",
                "sqlite:./voicequest.db?mode=rwc".to_string(),
            ),
            sqlite_max_connections: env_var_or("VQ_SQLITE_MAX_CONNECTIONS", 5),
            openai_api_key: env_var_or("OPENAI_API_KEY", String::new()),
            openai_base_url: env_var_or(
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            chat_model: env_var_or("VQ_CHAT_MODEL", "gpt-4o-mini".to_string()),
            chat_timeout: env_var_or("VQ_CHAT_TIMEOUT", 60),
            elevenlabs_api_key: env_var_or("ELEVENLABS_API_KEY", String::new()),
            elevenlabs_voice_id: env_var_or(
                "ELEVENLABS_VOICE_ID",
                "iP95p4xoKVk53GoZ742B".to_string(),
            ),
            tts_timeout: env_var_or("VQ_TTS_TIMEOUT", 15),
            lms_timeout: env_var_or("VQ_LMS_TIMEOUT", 10),
            assistant_history_cap: env_var_or("VQ_ASSISTANT_HISTORY_CAP", 20),
            assistant_session_cap: env_var_or("VQ_ASSISTANT_SESSION_CAP", 256),
            log_level: env_var_or("VQ_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the chat provider can be called at all.
    pub fn chat_configured(&self) -> bool {
        !self.openai_api_key.is_empty()
    }

    /// Whether the TTS provider can be called at all.
    pub fn tts_configured(&self) -> bool {
        !self.elevenlabs_api_key.is_empty()
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_env();

        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.tts_timeout, 15);
        assert_eq!(config.lms_timeout, 10);
        assert_eq!(config.assistant_history_cap, 20);
    }

    #[test]
    fn test_bind_address() {
        let mut config = Config::from_env();
        config.host = "127.0.0.1".to_string();
        config.port = 5000;
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_env_var_or_strips_comments() {
        std::env::set_var("VQ_TEST_COMMENTED", "42 # keep it small");
        let parsed: u64 = env_var_or("VQ_TEST_COMMENTED", 0);
        assert_eq!(parsed, 42);
        std::env::remove_var("VQ_TEST_COMMENTED");
    }
}
