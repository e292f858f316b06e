//! Configuration for the `cvs` binary.
//!
//! Sources are layered, later ones winning:
//! 1. Defaults in code
//! 2. A TOML file (`cvs.toml` in the working directory, or `--config FILE`)
//! 3. Environment variables with the `CVS__` prefix, e.g.
//!    `CVS__DATABASE__PATH=/srv/cvs.db` or `CVS__SEARCH__LIMIT=20`
//!
//! `--database` on the command line is applied by the caller after loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use cvs_core::Currency;
use cvs_db::DbConfig;
use directories::ProjectDirs;
use serde::Deserialize;

/// Main application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub currency: CurrencySettings,
    pub search: SearchSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// SQLite database file
    pub path: PathBuf,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a free connection
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrencySettings {
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchSettings {
    /// Maximum rows listed by a name search
    pub limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    /// Employees shown in the top-sellers report
    pub leaderboard_limit: u32,
}

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cvs.toml";

/// `<platform data dir>/cvs.db`, or `./cvs.db` when there is no home.
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "cvs")
        .map(|dirs| dirs.data_dir().join("cvs.db"))
        .unwrap_or_else(|| PathBuf::from("cvs.db"))
}

impl AppConfig {
    /// Load configuration from the optional file and the process environment.
    ///
    /// An explicit `path` must exist; the implicit `cvs.toml` may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."), path, Self::environment())
    }

    /// Like [`AppConfig::load`], looking for the implicit file in `dir`.
    ///
    /// The implicit file is named with its extension so a `cvs` executable
    /// sitting next to it is never picked up as configuration.
    fn load_in(dir: &Path, path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(dir.join(DEFAULT_CONFIG_FILE).as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let config = Self::defaults()?
            .add_source(file)
            .add_source(env)
            .build()?;

        Self::finish(config)
    }

    /// Load from a TOML string and an explicit environment map.
    pub fn from_sources(
        toml: &str,
        env: config::Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(Self::environment().source(Some(env)))
            .build()?;

        Self::finish(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default(
                "database.path",
                default_database_path().to_string_lossy().into_owned(),
            )?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout_secs", 30)?
            .set_default("currency.symbol", "₩")?
            .set_default("currency.decimals", 0)?
            .set_default("search.limit", 50)?
            .set_default("report.leaderboard_limit", 10)
    }

    fn environment() -> Environment {
        Environment::with_prefix("CVS")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(config: config::Config) -> Result<Self, ConfigError> {
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(
                "database.min_connections cannot exceed database.max_connections".to_string(),
            ));
        }
        if self.currency.decimals > 4 {
            return Err(ConfigError::Message(
                "currency.decimals must be between 0 and 4".to_string(),
            ));
        }
        if self.search.limit == 0 || self.report.leaderboard_limit == 0 {
            return Err(ConfigError::Message(
                "search.limit and report.leaderboard_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone())
            .max_connections(self.database.max_connections)
            .min_connections(self.database.min_connections)
            .connect_timeout(Duration::from_secs(self.database.connect_timeout_secs))
    }

    pub fn currency(&self) -> Currency {
        Currency::new(self.currency.symbol.clone(), self.currency.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources("", env(&[])).unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.connect_timeout_secs, 30);
        assert_eq!(config.search.limit, 50);
        assert_eq!(config.report.leaderboard_limit, 10);
        assert_eq!(config.currency(), Currency::krw());
        assert!(config.database.path.ends_with("cvs.db"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [database]
            path = "/var/lib/cvs/chain.db"

            [currency]
            symbol = "$"
            decimals = 2
        "#;
        let config = AppConfig::from_sources(toml, env(&[])).unwrap();

        assert_eq!(config.database.path, PathBuf::from("/var/lib/cvs/chain.db"));
        assert_eq!(config.currency(), Currency::new("$", 2));
        assert_eq!(config.search.limit, 50);
    }

    #[test]
    fn test_env_overrides_file() {
        let toml = "[search]\nlimit = 20\n";
        let config = AppConfig::from_sources(
            toml,
            env(&[
                ("CVS__SEARCH__LIMIT", "5"),
                ("CVS__DATABASE__MAX_CONNECTIONS", "2"),
            ]),
        )
        .unwrap();

        assert_eq!(config.search.limit, 5);
        assert_eq!(config.database.max_connections, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::from_sources("[search]\nlimit = 0\n", env(&[])).unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let toml = "[database]\nmax_connections = 1\nmin_connections = 3\n";
        assert!(AppConfig::from_sources(toml, env(&[])).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/cvs-test.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_implicit_file_ignores_binary_named_cvs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cvs"), b"\x7fELF\x02\x01\x01\x00").unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[search]\nlimit = 7\n").unwrap();

        let config =
            AppConfig::load_in(dir.path(), None, AppConfig::environment().source(Some(env(&[]))))
                .unwrap();
        assert_eq!(config.search.limit, 7);
    }

    #[test]
    fn test_implicit_file_may_be_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cvs"), b"\x7fELF\x02\x01\x01\x00").unwrap();

        let config =
            AppConfig::load_in(dir.path(), None, AppConfig::environment().source(Some(env(&[]))))
                .unwrap();
        assert_eq!(config.search.limit, 50);
    }

    #[test]
    fn test_db_config() {
        let config = AppConfig::from_sources("[database]\npath = \"/tmp/a.db\"\n", env(&[])).unwrap();
        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(db.max_connections, 5);
    }
}
