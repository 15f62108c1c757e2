//! Configuration module for the registration backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Longest admin session accepted from the environment (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Admin login email; login is disabled when unset
    pub admin_email: Option<String>,
    /// Admin login password; login is disabled when unset
    pub admin_password: Option<String>,
    /// Lifetime of an admin session in hours
    pub session_ttl_hours: i64,
    /// Required email domain for participants (empty disables the check)
    pub email_domain: String,
    /// Members per team besides the leader
    pub team_size: usize,
}

/// A malformed environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("HACKREG_DB_PATH")
            .unwrap_or_else(|_| "./data/hackreg.sqlite".to_string())
            .into();

        let bind_addr = parse_var("HACKREG_BIND_ADDR", "127.0.0.1:5000")?;

        let log_level = env::var("HACKREG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_email = non_empty_var("HACKREG_ADMIN_EMAIL");
        let admin_password = non_empty_var("HACKREG_ADMIN_PASSWORD");

        let session_ttl_hours: i64 = parse_var("HACKREG_SESSION_TTL_HOURS", "12")?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError {
                key: "HACKREG_SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        let email_domain =
            env::var("HACKREG_EMAIL_DOMAIN").unwrap_or_else(|_| "jklu.edu.in".to_string());

        let team_size = parse_var("HACKREG_TEAM_SIZE", "3")?;

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            admin_email,
            admin_password,
            session_ttl_hours,
            email_domain,
            team_size,
        })
    }

    /// Whether admin login is possible with this configuration.
    pub fn admin_enabled(&self) -> bool {
        self.admin_email.is_some() && self.admin_password.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|_| ConfigError { key, value: raw })
}
