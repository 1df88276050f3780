use std::collections::HashMap;

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// SMTP account used for outgoing mail. Mail is disabled unless both the
/// user and the app password are present.
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// bcrypt accepts work factors in this range only.
const BCRYPT_COSTS: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Default)]
pub struct ImageHostConfig {
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub frontend_url: String,
    pub reset_token_fallback: bool,
    pub mail: MailConfig,
    pub images: ImageHostConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_map(vars: &HashMap<&str, &str>) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        let bcrypt_cost = parse_or(get("BCRYPT_COST"), "BCRYPT_COST", 10)?;
        if !BCRYPT_COSTS.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", 5000)?,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://bizconnect.db".to_string()),
            database_max_connections: parse_or(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                5,
            )?,
            jwt_secret,
            token_ttl: Duration::days(7),
            reset_token_ttl: Duration::hours(24),
            bcrypt_cost,
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .trim_end_matches('/')
                .to_string(),
            reset_token_fallback: parse_flag(
                get("RESET_TOKEN_FALLBACK"),
                "RESET_TOKEN_FALLBACK",
                true,
            )?,
            mail: MailConfig {
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                user: get("EMAIL_USER"),
                password: get("EMAIL_APP_PASSWORD"),
            },
            images: ImageHostConfig {
                cloud_name: get("CLOUDINARY_CLOUD_NAME"),
                upload_preset: get("CLOUDINARY_UPLOAD_PRESET"),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_flag(raw: Option<String>, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
