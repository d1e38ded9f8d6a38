use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    pub confirmation_code_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub default_from_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:yamdb.db".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            auth: AuthConfig {
                jwt_secret: "change-me".to_string(),
                jwt_expiry_secs: 24 * 3600,
                confirmation_code_length: 16,
            },
            pagination: PaginationConfig { page_size: 20 },
            mail: MailConfig {
                default_from_email: "noreply@yamdb.local".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", defaults.database.max_connections)?,
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", defaults.server.port)?,
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                    tracing::warn!("JWT_SECRET is not set, using the development secret");
                    defaults.auth.jwt_secret
                }),
                jwt_expiry_secs: parse_or("JWT_EXPIRY_SECS", defaults.auth.jwt_expiry_secs)?,
                confirmation_code_length: parse_or(
                    "CONFIRMATION_CODE_LENGTH",
                    defaults.auth.confirmation_code_length,
                )?,
            },
            pagination: PaginationConfig {
                page_size: parse_or("PAGE_SIZE", defaults.pagination.page_size)?,
            },
            mail: MailConfig {
                default_from_email: env::var("DEFAULT_FROM_EMAIL")
                    .unwrap_or(defaults.mail.default_from_email),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
