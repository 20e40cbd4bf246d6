// [library] Secrecy crate - keeps the database password out of Debug output and logs
use secrecy::{ExposeSecret, Secret};

// [library] SQLx connection options - built from individual settings instead of a URL
use sqlx::postgres::PgConnectOptions;

// [library] Typed configuration errors
use thiserror::Error;

// [business] Fallbacks used when an optional variable is not set
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_DATABASE: &str = "lightbnb";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

// [rust] Debug is safe to derive - Secret<T> prints as [REDACTED]
#[derive(Debug, Clone)]
pub struct Config {
    // [business] Where the PostgreSQL server lives
    pub db_host: String,
    pub db_port: u16,

    // [security] Credentials - the password never leaves the Secret wrapper except at connect time
    pub db_user: String,
    pub db_pass: Secret<String>,

    pub db_name: String,
}

impl Config {
    // [business] Factory method - loads .env (if any) then reads the process environment
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // [library] Missing .env is fine outside development, so the error is discarded
        dotenvy::dotenv().ok();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        // [library] Log the connection target, never the password
        tracing::info!(
            "Config loaded - Database: {}@{}:{}/{}",
            config.db_user,
            config.db_host,
            config.db_port,
            config.db_name
        );

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// `DB_USER` and `DB_PASS` are required; `DB_HOST`, `DB_PORT` and `DB_NAME`
    /// fall back to a local development database.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // [rust] Treat blank values the same as unset ones
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_port: u16 = match var("DB_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "DB_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            db_host: var("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            db_port,
            db_user: var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
            db_pass: Secret::new(var("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?),
            db_name: var("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }

    // [library] Connection options for sqlx - this is the one place the password is exposed
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(self.db_pass.expose_secret())
            .database(&self.db_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_fill_optional_settings() {
        let config = Config::from_vars(lookup_from(&[("DB_USER", "vagrant"), ("DB_PASS", "123")]))
            .expect("required settings are present");

        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.db_name, "lightbnb");
        assert_eq!(config.db_user, "vagrant");
        assert_eq!(config.db_pass.expose_secret(), "123");
    }

    #[test]
    fn test_explicit_settings_override_defaults() {
        let config = Config::from_vars(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", " 6543 "),
            ("DB_USER", "app"),
            ("DB_PASS", "s3cret"),
            ("DB_NAME", "rentals"),
        ]))
        .unwrap();

        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.db_name, "rentals");
    }

    #[test]
    fn test_missing_credentials() {
        assert_eq!(
            Config::from_vars(lookup_from(&[("DB_PASS", "123")])).unwrap_err(),
            ConfigError::Missing("DB_USER")
        );
        assert_eq!(
            Config::from_vars(lookup_from(&[("DB_USER", "vagrant"), ("DB_PASS", "  ")]))
                .unwrap_err(),
            ConfigError::Missing("DB_PASS")
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(lookup_from(&[
            ("DB_USER", "vagrant"),
            ("DB_PASS", "123"),
            ("DB_PORT", "not-a-port"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { var: "DB_PORT", .. }));
    }

    #[test]
    fn test_debug_output_redacts_password() {
        let config =
            Config::from_vars(lookup_from(&[("DB_USER", "vagrant"), ("DB_PASS", "hunter2")]))
                .unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
    }
}
