use nokari::model::id::UserId;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Overrides `token` from the config file.
pub const ENV_TOKEN: &str = "DISCORD_BOT_TOKEN";
/// Overrides `loglevel` from the config file.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no token provided")]
    MissingToken,
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: String,
    pub loglevel: LevelFilter,
    /// Users allowed to run owner only commands.
    pub owners: Vec<UserId>,
    /// Prefixes used in guilds without custom prefixes.
    pub default_prefixes: Vec<String>,
    /// Match top-level command names ignoring case.
    pub insensitive_commands: bool,
    /// Seconds to wait for an answer to a prompt.
    pub prompt_timeout: u64,
    /// Number of messages kept to handle edited and deleted invocations.
    pub message_cache_size: usize,
    pub database: Database,
}

impl Config {
    /// Reads the config from `path`, applying overrides from the environment.
    pub fn load<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let buf = fs::read_to_string(path)?;
        let mut config = Self::parse(&buf)?;

        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Applies overrides using the lookup function `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = var(ENV_TOKEN) {
            self.token = token;
        }

        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.loglevel = level
                .parse()
                .map_err(|_| Error::InvalidLogLevel(level.clone()))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        Ok(())
    }

    pub fn prompt_timeout(&self) -> Duration {
        Duration::from_secs(self.prompt_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            loglevel: LevelFilter::Info,
            owners: Vec::new(),
            default_prefixes: vec![String::from("nokari"), String::from("n!")],
            insensitive_commands: true,
            prompt_timeout: 60,
            message_cache_size: 1024,
            database: Database::default(),
        }
    }
}

/// Database configuration section. Not all
/// fields are required for all driver types.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Database {
    pub fn connect_string(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}?ssl-mode=DISABLED",
            self.driver, self.user, self.password, self.host, self.port, self.database
        )
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            driver: String::from("mysql"),
            host: String::from("127.0.0.1"),
            port: 3306,
            user: String::from("nokari"),
            password: String::new(),
            database: String::from("nokari"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Database, Error};

    use log::LevelFilter;
    use nokari::model::id::UserId;

    #[test]
    fn test_database_connect_string() {
        let database = Database {
            driver: String::from("mysql"),
            host: String::from("127.0.0.1"),
            port: 3306,
            user: String::from("nokari"),
            password: String::from("pw"),
            database: String::from("db"),
        };

        assert_eq!(
            database.connect_string(),
            "mysql://nokari:pw@127.0.0.1:3306/db?ssl-mode=DISABLED"
        )
    }

    #[test]
    fn test_parse_config() {
        let config = Config::parse(
            r#"
            token = "abc"
            loglevel = "debug"
            owners = [265080794911866881]

            [database]
            host = "db"
            "#,
        )
        .unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.loglevel, LevelFilter::Debug);
        assert_eq!(config.owners, [UserId(265080794911866881)]);
        assert_eq!(config.default_prefixes, ["nokari", "n!"]);
        assert!(config.insensitive_commands);
        assert_eq!(config.message_cache_size, 1024);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn test_apply_env() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(Error::MissingToken)));

        config
            .apply_env(|key| match key {
                "DISCORD_BOT_TOKEN" => Some(String::from("env")),
                "LOG_LEVEL" => Some(String::from("warn")),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.token, "env");
        assert_eq!(config.loglevel, LevelFilter::Warn);
        assert!(config.validate().is_ok());

        let res = config.apply_env(|key| (key == "LOG_LEVEL").then(|| String::from("loud")));
        assert!(matches!(res, Err(Error::InvalidLogLevel(_))));
    }
}
