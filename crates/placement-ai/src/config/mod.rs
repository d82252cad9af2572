use std::env;
use std::fmt;

/// Deployment stage. Production defaults to JSON log lines.
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

/// Top-level configuration for the placement tooling.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub audit: AuditConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let json = match env::var("APP_LOG_FORMAT") {
            Ok(format) => {
                let normalized = format.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    "json" => true,
                    "compact" | "text" => false,
                    _ => return Err(ConfigError::UnknownLogFormat(format)),
                }
            }
            Err(_) => environment == AppEnvironment::Production,
        };

        let actor = env::var("PLACEMENT_AUDIT_ACTOR").unwrap_or_else(|_| "system".to_string());
        if actor.trim().is_empty() {
            return Err(ConfigError::EmptyAuditActor);
        }

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level, json },
            audit: AuditConfig {
                actor: actor.trim().to_string(),
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

/// Identity stamped on audit entries written by operator tooling.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub actor: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyAuditActor,
    UnknownLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyAuditActor => {
                write!(f, "PLACEMENT_AUDIT_ACTOR must not be empty when set")
            }
            ConfigError::UnknownLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be `json` or `compact`, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
