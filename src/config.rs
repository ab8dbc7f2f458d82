// src/config.rs

use std::{env, fmt};

use dotenvy::dotenv;
use regex::Regex;

/// Number of entries shown on the public leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;
/// Time limit applied when a quiz is created without one (minutes).
pub const DEFAULT_TIME_LIMIT_MINUTES: i64 = 10;
/// Point value applied when a question is created without one.
pub const DEFAULT_QUESTION_POINTS: i64 = 1;

const DEFAULT_DATABASE_URL: &str = "sqlite://quizapp.db?mode=rwc";
const DEFAULT_JWT_EXPIRATION: u64 = 30 * 24 * 60 * 60;
const DEFAULT_PORT: u16 = 5000;
const TABLE_PREFIX_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]{0,47}$";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub tables: TableNames,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub admin_name: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

/// Names of the storage tables, resolved once from the environment and
/// handed to the database handle at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub users: String,
    pub quizzes: String,
    pub results: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            quizzes: "quizzes".to_string(),
            results: "results".to_string(),
        }
    }
}

impl TableNames {
    /// Builds table names from an optional prefix, e.g. `prod` -> `prod_results`.
    pub fn with_prefix(prefix: Option<&str>) -> Result<Self, ConfigError> {
        let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) else {
            return Ok(Self::default());
        };

        let pattern = Regex::new(TABLE_PREFIX_PATTERN).map_err(|e| ConfigError::Invalid {
            key: "TABLE_PREFIX",
            reason: e.to_string(),
        })?;

        // The prefix is spliced into SQL, so only plain identifiers are accepted.
        if !pattern.is_match(prefix) {
            return Err(ConfigError::Invalid {
                key: "TABLE_PREFIX",
                reason: format!("'{}' is not a valid table identifier", prefix),
            });
        }

        Ok(Self {
            users: format!("{}_users", prefix),
            quizzes: format!("{}_quizzes", prefix),
            results: format!("{}_results", prefix),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "invalid {}: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = match lookup("JWT_EXPIRATION") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "JWT_EXPIRATION",
                reason: format!("'{}' is not a number of seconds", raw),
            })?,
            None => DEFAULT_JWT_EXPIRATION,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{}' is not a valid port", raw),
            })?,
            None => DEFAULT_PORT,
        };

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        // DDB_TABLE is the older name for the same setting.
        let prefix = lookup("TABLE_PREFIX").or_else(|| lookup("DDB_TABLE"));
        let tables = TableNames::with_prefix(prefix.as_deref())?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            tables,
            cors_origins,
            admin_name: lookup("ADMIN_NAME").unwrap_or_else(|| "Admin User".to_string()),
            admin_email: lookup("ADMIN_EMAIL"),
            admin_password: lookup("ADMIN_PASSWORD"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.tables, TableNames::default());
        assert!(config.cors_origins.is_empty());
        assert!(config.admin_email.is_none());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn table_prefix_is_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("TABLE_PREFIX", "staging"),
        ]))
        .unwrap();

        assert_eq!(config.tables.users, "staging_users");
        assert_eq!(config.tables.quizzes, "staging_quizzes");
        assert_eq!(config.tables.results, "staging_results");
    }

    #[test]
    fn ddb_table_is_a_fallback_prefix() {
        let config =
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("DDB_TABLE", "legacy")]))
                .unwrap();
        assert_eq!(config.tables.quizzes, "legacy_quizzes");

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("DDB_TABLE", "legacy"),
            ("TABLE_PREFIX", "current"),
        ]))
        .unwrap();
        assert_eq!(config.tables.quizzes, "current_quizzes");
    }

    #[test]
    fn unsafe_table_prefix_is_rejected() {
        assert!(TableNames::with_prefix(Some("quiz; DROP TABLE users")).is_err());
        assert!(TableNames::with_prefix(Some("1abc")).is_err());
        assert_eq!(TableNames::with_prefix(Some("  ")).unwrap(), TableNames::default());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGINS", "http://localhost:5173, https://quiz.example.com,"),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://quiz.example.com"]
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
