//! # Depot Configuration
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.
//!
//! | Variable                             | Default    |
//! |--------------------------------------|------------|
//! | `DEPOT_DATABASE_PATH`                | `depot.db` |
//! | `DEPOT_DB_MAX_CONNECTIONS`           | `5`        |
//! | `DEPOT_DB_CONNECT_TIMEOUT_SECS`      | `30`       |
//! | `DEPOT_RUN_MIGRATIONS`               | `true`     |
//! | `DEPOT_ENFORCE_REPLACEMENT_HEADROOM` | `false`    |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use depot_core::LifecycleConfig;

use crate::pool::DbConfig;

pub const DATABASE_PATH: &str = "DEPOT_DATABASE_PATH";
pub const DB_MAX_CONNECTIONS: &str = "DEPOT_DB_MAX_CONNECTIONS";
pub const DB_CONNECT_TIMEOUT_SECS: &str = "DEPOT_DB_CONNECT_TIMEOUT_SECS";
pub const RUN_MIGRATIONS: &str = "DEPOT_RUN_MIGRATIONS";
pub const ENFORCE_REPLACEMENT_HEADROOM: &str = "DEPOT_ENFORCE_REPLACEMENT_HEADROOM";

/// Database and lifecycle settings for a Depot process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepotConfig {
    pub database: DbConfig,
    pub lifecycle: LifecycleConfig,
}

impl DepotConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DbConfig::default();

        let database_path = lookup(DATABASE_PATH)
            .filter(|path| !path.trim().is_empty())
            .map(Into::into)
            .unwrap_or(defaults.database_path);

        let max_connections: u32 =
            parse_or(&lookup, DB_MAX_CONNECTIONS, defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(DB_MAX_CONNECTIONS.to_string()));
        }

        let connect_timeout_secs: u64 = parse_or(
            &lookup,
            DB_CONNECT_TIMEOUT_SECS,
            defaults.connect_timeout.as_secs(),
        )?;

        let database = DbConfig::new(database_path)
            .max_connections(max_connections)
            .min_connections(defaults.min_connections.min(max_connections))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .run_migrations(parse_or(&lookup, RUN_MIGRATIONS, defaults.run_migrations)?);

        let lifecycle = LifecycleConfig::default().enforce_replacement_headroom(parse_or(
            &lookup,
            ENFORCE_REPLACEMENT_HEADROOM,
            false,
        )?);

        Ok(DepotConfig {
            database,
            lifecycle,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> Result<DepotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DepotConfig::load_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config, DepotConfig::default());
        assert_eq!(config.database.database_path, PathBuf::from("depot.db"));
        assert!(config.database.run_migrations);
        assert!(!config.lifecycle.enforce_replacement_headroom);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (DATABASE_PATH, "/srv/depot/depot.db"),
            (DB_MAX_CONNECTIONS, "12"),
            (DB_CONNECT_TIMEOUT_SECS, " 3 "),
            (RUN_MIGRATIONS, "false"),
            (ENFORCE_REPLACEMENT_HEADROOM, "true"),
        ])
        .unwrap();

        assert_eq!(
            config.database.database_path,
            PathBuf::from("/srv/depot/depot.db")
        );
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.database.connect_timeout, Duration::from_secs(3));
        assert!(!config.database.run_migrations);
        assert!(config.lifecycle.enforce_replacement_headroom);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            (DB_MAX_CONNECTIONS, "many"),
            (DB_MAX_CONNECTIONS, "0"),
            (DB_CONNECT_TIMEOUT_SECS, "-1"),
            (RUN_MIGRATIONS, "yes"),
            (ENFORCE_REPLACEMENT_HEADROOM, "on"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid value for {}", key));
        }
    }

    #[test]
    fn test_blank_path_falls_back_to_default() {
        let config = load(&[(DATABASE_PATH, "  ")]).unwrap();
        assert_eq!(config.database.database_path, PathBuf::from("depot.db"));
    }
}
