use std::env;

use dotenv::dotenv;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_ELEVATION_API_URL: &str = "https://api.opentopodata.org/v1/test-dataset";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("invalid DATABASE_SSL: {0}")]
    InvalidSsl(String),
}

/// TLS towards Postgres. Hosted databases commonly present certificates that
/// do not chain to a public root, so `Require` encrypts without verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseSsl {
    #[default]
    Disable,
    Require,
    VerifyFull,
}

pub fn parse_ssl(value: &str) -> Result<DatabaseSsl, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "off" | "disable" => Ok(DatabaseSsl::Disable),
        "1" | "true" | "on" | "require" => Ok(DatabaseSsl::Require),
        "verify-full" => Ok(DatabaseSsl::VerifyFull),
        _ => Err(ConfigError::InvalidSsl(value.to_string())),
    }
}

fn database_ssl<F>(lookup: &F) -> Result<DatabaseSsl, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("DATABASE_SSL") {
        Some(v) => parse_ssl(&v),
        None => Ok(DatabaseSsl::Disable),
    }
}

/// Where and how to reach Postgres.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub ssl: DatabaseSsl,
}

impl DatabaseConfig {
    /// `DATABASE_URL` and `DATABASE_SSL` alone, for the command line tools.
    pub fn from_env() -> Result<DatabaseConfig, ConfigError> {
        dotenv().ok();
        DatabaseConfig::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<DatabaseConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(DatabaseConfig {
            url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            ssl: database_ssl(&lookup)?,
        })
    }
}

/// The static admin login for the log viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn matches(&self, username: Option<&str>, password: Option<&str>) -> bool {
        username == Some(self.username.as_str()) && password == Some(self.password.as_str())
    }
}

/// Settings resolved once at start.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_ssl: DatabaseSsl,
    pub bind_address: String,
    pub port: u16,
    pub admin: AdminCredentials,
    pub elevation_api_url: String,
}

impl Config {
    /// Read the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn database(&self) -> Result<DatabaseConfig, ConfigError> {
        let url = self
            .database_url
            .clone()
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(DatabaseConfig {
            url,
            ssl: self.database_ssl,
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => parse_port(&p)?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL"),
            database_ssl: database_ssl(&lookup)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            admin: AdminCredentials {
                username: lookup("ADMIN_USERNAME").ok_or(ConfigError::Missing("ADMIN_USERNAME"))?,
                password: lookup("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?,
            },
            elevation_api_url: lookup("ELEVATION_API_URL")
                .unwrap_or_else(|| DEFAULT_ELEVATION_API_URL.to_string()),
        })
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("ADMIN_USERNAME", "admin"), ("ADMIN_PASSWORD", "secret")]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.elevation_api_url, DEFAULT_ELEVATION_API_URL);
        assert_eq!(config.database(), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(config.database_ssl, DatabaseSsl::Disable);
    }

    #[test]
    fn values_are_read() {
        let config = config_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("PORT", "8088"),
            ("DATABASE_URL", "postgres://localhost/logs"),
        ])
        .unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(
            config.database(),
            Ok(DatabaseConfig {
                url: "postgres://localhost/logs".to_string(),
                ssl: DatabaseSsl::Disable,
            })
        );
    }

    #[test]
    fn database_ssl_switch_is_read() {
        let config = config_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("DATABASE_URL", "postgres://db.example.com/logs"),
            ("DATABASE_SSL", "true"),
        ])
        .unwrap();
        assert_eq!(config.database().unwrap().ssl, DatabaseSsl::Require);
    }

    #[test]
    fn ssl_values_parse() {
        assert_eq!(parse_ssl("1"), Ok(DatabaseSsl::Require));
        assert_eq!(parse_ssl("Require"), Ok(DatabaseSsl::Require));
        assert_eq!(parse_ssl("verify-full"), Ok(DatabaseSsl::VerifyFull));
        assert_eq!(parse_ssl("false"), Ok(DatabaseSsl::Disable));
        assert_eq!(parse_ssl("sometimes"), Err(ConfigError::InvalidSsl("sometimes".to_string())));
    }

    #[test]
    fn tools_need_only_the_database() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db.example.com/logs"),
            ("DATABASE_SSL", "verify-full"),
        ]
        .into_iter()
        .collect();
        let db = DatabaseConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(db.url, "postgres://db.example.com/logs");
        assert_eq!(db.ssl, DatabaseSsl::VerifyFull);

        let err = DatabaseConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn bad_ssl_value_is_rejected() {
        let err = config_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("DATABASE_SSL", "maybe"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSsl("maybe".to_string()));
    }

    #[test]
    fn admin_credentials_are_required() {
        let err = config_from(&[("ADMIN_USERNAME", "admin")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ADMIN_PASSWORD"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = config_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("PORT", "http"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".to_string()));
    }

    #[test]
    fn credentials_need_exact_match() {
        let admin = AdminCredentials {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        assert!(admin.matches(Some("admin"), Some("secret")));
        assert!(!admin.matches(Some("admin"), Some("Secret")));
        assert!(!admin.matches(None, Some("secret")));
    }
}
