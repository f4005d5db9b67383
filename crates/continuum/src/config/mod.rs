use crate::workflows::attendance::{DatasetPaths, JoinPolicy};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
    pub attendance_year: i32,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let data_dir = PathBuf::from(var_or("APP_DATA_DIR", "data"));
        let defaults = DatasetPaths::in_dir(&data_dir);
        let paths = DatasetPaths {
            time_off: env::var("APP_TIME_OFF_PATH").map_or(defaults.time_off, PathBuf::from),
            workdays: env::var("APP_WORKDAYS_PATH").map_or(defaults.workdays, PathBuf::from),
            project_log: env::var("APP_PROJECT_LOG_PATH")
                .map_or(defaults.project_log, PathBuf::from),
        };
        let join_raw = var_or("APP_JOIN_POLICY", JoinPolicy::default().label());
        let join_policy =
            JoinPolicy::parse(&join_raw).ok_or(ConfigError::InvalidJoinPolicy(join_raw))?;

        let temperature = var_or("APP_LLM_TEMPERATURE", "0.7")
            .parse::<f32>()
            .ok()
            .filter(|value| (0.0..=2.0).contains(value))
            .ok_or(ConfigError::InvalidTemperature)?;
        let timeout_secs = var_or("APP_LLM_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let attendance_year = var_or("APP_ATTENDANCE_YEAR", "2023")
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidYear)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig { paths, join_policy },
            llm: LlmConfig {
                base_url: var_or("APP_LLM_BASE_URL", "http://localhost:1234/v1"),
                api_key: var_or("APP_LLM_API_KEY", "lm-studio"),
                model: var_or("APP_LLM_MODEL", "ggml-model-Q4_K_M.gguf"),
                temperature,
                timeout: Duration::from_secs(timeout_secs),
            },
            auth: AuthConfig {
                username: var_or("APP_AUTH_USERNAME", "Zhalae"),
                password: var_or("APP_AUTH_PASSWORD", "password"),
            },
            attendance_year,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the attendance exports live and how they are joined.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub paths: DatasetPaths,
    pub join_policy: JoinPolicy,
}

/// OpenAI-compatible chat endpoint settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidJoinPolicy(String),
    InvalidTemperature,
    InvalidTimeout,
    InvalidYear,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidJoinPolicy(value) => {
                write!(f, "APP_JOIN_POLICY must be 'outer' or 'inner', got '{value}'")
            }
            ConfigError::InvalidTemperature => {
                write!(f, "APP_LLM_TEMPERATURE must be a number between 0 and 2")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "APP_LLM_TIMEOUT_SECS must be a positive whole number")
            }
            ConfigError::InvalidYear => write!(f, "APP_ATTENDANCE_YEAR must be a year"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
