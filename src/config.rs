use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub default_question_count: usize,
    pub max_question_count: usize,
    pub chunk_size: usize,
    pub generation_timeout_secs: u64,
    pub session_ttl_minutes: i64,
    pub max_sessions: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let config = Self {
            server_address: get_env("SERVER_ADDRESS")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            openai_base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: get_env_or("OPENAI_MODEL", "gpt-4o-mini"),
            default_question_count: get_env_parse_or("QUIZ_DEFAULT_COUNT", 5)?,
            max_question_count: get_env_parse_or("QUIZ_MAX_COUNT", 20)?,
            chunk_size: get_env_parse_or("QUIZ_CHUNK_SIZE", 3000)?,
            generation_timeout_secs: get_env_parse_or("GENERATION_TIMEOUT_SECS", 120)?,
            session_ttl_minutes: get_env_parse_or("SESSION_TTL_MINUTES", 240)?,
            max_sessions: get_env_parse_or("MAX_SESSIONS", 10_000)?,
        };

        if config.chunk_size == 0 {
            return Err(Error::Config("QUIZ_CHUNK_SIZE must be positive".to_string()));
        }
        if config.default_question_count == 0 || config.max_question_count == 0 {
            return Err(Error::Config("Quiz question counts must be positive".to_string()));
        }

        if config.max_sessions == 0 {
            return Err(Error::Config("MAX_SESSIONS must be positive".to_string()));
        }
        if config.session_ttl_minutes < 0 {
            return Err(Error::Config("SESSION_TTL_MINUTES must not be negative".to_string()));
        }

        Ok(config)
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        match self.generation_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn session_ttl(&self) -> Option<chrono::Duration> {
        match self.session_ttl_minutes {
            0 => None,
            minutes => Some(chrono::Duration::minutes(minutes)),
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
