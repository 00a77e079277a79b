use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.deepseek.com/v1/tts";

#[derive(Debug, Clone)]
pub struct Config {
    /// Only used to print the public URL; the listener binds every interface
    pub host: String,
    pub port: u16,
    pub api_key: ApiKey,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    pub static_dir: PathBuf,
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TTS_API_KEY must be set to the provider credential")]
    MissingCredential,
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TTS_API_KEY")
            .map(ApiKey::new)
            .filter(ApiKey::is_present)
            .ok_or(ConfigError::MissingCredential)?;

        let config = Config {
            host: lookup("HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_var(&lookup, "PORT", 3000)?,
            api_key,
            upstream_url: lookup("TTS_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            upstream_timeout: Duration::from_secs(parse_var(
                &lookup,
                "TTS_UPSTREAM_TIMEOUT_SECS",
                30,
            )?),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            environment: match lookup("ENVIRONMENT").as_deref() {
                Some("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
