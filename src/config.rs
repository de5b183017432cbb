//! Configuration module
//!
//! Everything that talks to an external system (SNS region and credentials,
//! MySQL host and credentials) must be supplied by the environment. There are
//! no working fallbacks for those values.

use std::env;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("environment variable {name} still holds a placeholder value ({value})")]
    Placeholder { name: &'static str, value: String },

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the four ONNX classifier artifacts
    pub model_dir: PathBuf,

    /// Create the `disaster_data` table at startup if it is missing
    pub auto_migrate: bool,

    /// Environment (development, production)
    pub environment: String,

    pub gateway: GatewayConfig,

    pub database: DatabaseConfig,
}

/// AWS SNS settings
#[derive(Clone)]
pub struct GatewayConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// MySQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    /// Host, port and database name, safe to log
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| -> Option<String> {
            lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let required = |name: &'static str| -> Result<String, ConfigError> {
            let value = get(name).ok_or(ConfigError::Missing(name))?;
            if value.starts_with('<') && value.ends_with('>') {
                return Err(ConfigError::Placeholder { name, value });
            }
            Ok(value)
        };

        let parsed = |name: &'static str, default: u16| -> Result<u16, ConfigError> {
            match get(name) {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { name, value }),
                None => Ok(default),
            }
        };

        let region = match get("SNS_REGION") {
            Some(_) => required("SNS_REGION")?,
            None => required("AWS_REGION")?,
        };

        let gateway = GatewayConfig {
            region,
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            session_token: get("AWS_SESSION_TOKEN"),
        };

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: parsed("DB_PORT", 3306)?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            database: required("DB_NAME")?,
        };

        let auto_migrate = match get("DB_AUTO_MIGRATE") {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ConfigError::Invalid { name: "DB_AUTO_MIGRATE", value }),
            },
            None => true,
        };

        Ok(Self {
            port: parsed("PORT", 8080)?,
            model_dir: get("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
            auto_migrate,
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            gateway,
            database,
        })
    }
}
