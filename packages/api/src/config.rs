use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use shared::services::match_service::DEFAULT_MAX_MOVE_ATTEMPTS;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStore {
    DynamoDb { table_name: String },
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub store: MatchStore,
    pub request_timeout: Duration,
    pub max_move_attempts: u32,
    /// Serve on a plain TCP listener instead of the Lambda runtime.
    pub local_bind_addr: Option<SocketAddr>,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} environment variable must be set", key),
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid value {:?} for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let store = match lookup("MATCH_STORE").as_deref().unwrap_or("dynamodb") {
            "dynamodb" => MatchStore::DynamoDb {
                table_name: lookup("MATCHES_TABLE")
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::Missing("MATCHES_TABLE"))?,
            },
            "memory" => MatchStore::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "MATCH_STORE",
                    value: other.to_string(),
                    reason: "expected dynamodb or memory".to_string(),
                })
            }
        };

        let request_timeout_ms = parse_or(&lookup, "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;
        if request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_MS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let max_move_attempts = parse_or(&lookup, "MAX_MOVE_ATTEMPTS", DEFAULT_MAX_MOVE_ATTEMPTS)?;
        if max_move_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_MOVE_ATTEMPTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let local_bind_addr = match lookup("LOCAL_BIND_ADDR").filter(|s| !s.is_empty()) {
            Some(value) => Some(value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: "LOCAL_BIND_ADDR",
                    value,
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(ApiConfig {
            jwt_secret,
            store,
            request_timeout: Duration::from_millis(request_timeout_ms),
            max_move_attempts,
            local_bind_addr,
            log_format,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
