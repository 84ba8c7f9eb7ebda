use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::progression::engine::EngineConfig;

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
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("LEO_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("LEO_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("LEO_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("LEO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timer_target_seconds = env::var("LEO_TIMER_TARGET_SECONDS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidTimerTarget)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineSettings {
                timer_target_seconds,
            },
        })
    }
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

/// Environment-tunable knobs for the progression engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub timer_target_seconds: u32,
}

impl EngineSettings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            timer_target_seconds: self.timer_target_seconds,
            ..EngineConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimerTarget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "LEO_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "LEO_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimerTarget => {
                write!(f, "LEO_TIMER_TARGET_SECONDS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimerTarget => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
