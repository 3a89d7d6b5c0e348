use crate::{
    error::{ConfigError, Error, StdIoError, TomlDeError},
    session::MAX_SESSION_LIFETIME_SECONDS,
};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

pub const CONFIG_ENV_VAR: &str = "REGISTRATION_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub mode: StorageMode,
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Sqlite,
            database_url: "registration.sqlite".to_string(),
            max_connections: 4,
        }
    }
}

///Text shown around the form.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectContent {
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub lead: String,
}

impl Default for ProjectContent {
    fn default() -> Self {
        Self {
            page_title: "Project Spider Bot Registration".to_string(),
            title: "Project Spider Bot".to_string(),
            subtitle: "Robotics & Intelligent Systems Initiative".to_string(),
            lead: "Your Name".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub cookie_name: String,
    pub secure_cookies: bool,
    pub session_lifetime_seconds: i64,
    pub session_sweep_interval_seconds: u64,
    pub log_directory: Option<PathBuf>,
    pub storage: StorageConfig,
    pub project: ProjectContent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8501".to_string(),
            cookie_name: "spider_bot_session".to_string(),
            secure_cookies: false,
            session_lifetime_seconds: 3600,
            session_sweep_interval_seconds: 60,
            log_directory: None,
            storage: StorageConfig::default(),
            project: ProjectContent::default(),
        }
    }
}

impl Config {
    pub fn from_toml(toml_string: &str, origin: &str) -> Result<Self, Error> {
        let config = match toml::from_str::<Config>(toml_string) {
            Ok(config) => config,
            Err(err) => {
                return Err(Error::Config(ConfigError::ParseConfigFile(
                    TomlDeError(err),
                    origin.to_string(),
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let toml_string = match fs::read_to_string(path) {
            Ok(toml_string) => toml_string,
            Err(err) => {
                return Err(Error::Config(ConfigError::ReadConfigFile(
                    StdIoError(err),
                    path.display().to_string(),
                )))
            }
        };
        Self::from_toml(&toml_string, &path.display().to_string())
    }

    /// Loads the configuration from, in order: an explicit path, the
    /// `REGISTRATION_CONFIG` environment variable, or `config.toml` in the
    /// platform config directory.
    ///
    /// An explicitly named file must exist. The platform default may be absent,
    /// in which case every setting takes its default.
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self, Error> {
        let path = explicit_path.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        if let Some(path) = path {
            return Self::from_file(&path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        match self.bind_address.parse::<SocketAddr>() {
            Ok(addr) => Ok(addr),
            Err(_) => Err(Error::Config(ConfigError::InvalidBindAddress(
                self.bind_address.to_owned(),
            ))),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        self.socket_addr()?;
        validate_session_lifetime(self.session_lifetime_seconds)
    }
}

///Accepts 1 second up to [`MAX_SESSION_LIFETIME_SECONDS`].
pub fn validate_session_lifetime(session_lifetime_seconds: i64) -> Result<(), Error> {
    if session_lifetime_seconds <= 0 || session_lifetime_seconds > MAX_SESSION_LIFETIME_SECONDS {
        return Err(Error::Config(ConfigError::InvalidSessionLifetime(
            session_lifetime_seconds,
        )));
    }
    Ok(())
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "spiderbot", "spider-bot-registration")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        let config = Config::from_toml("", "inline").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.project.title, "Project Spider Bot");
        assert_eq!(config.storage.mode, StorageMode::Sqlite);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config = Config::from_toml(
            r#"
            bind_address = "127.0.0.1:9000"
            session_lifetime_seconds = 120

            [storage]
            mode = "memory"

            [project]
            lead = "Dr. Weaver"
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert_eq!(config.session_lifetime_seconds, 120);
        assert_eq!(config.storage.mode, StorageMode::Memory);
        assert_eq!(config.storage.database_url, "registration.sqlite");
        assert_eq!(config.project.lead, "Dr. Weaver");
        assert_eq!(config.project.title, "Project Spider Bot");
    }

    #[test]
    fn rejects_bad_bind_address() {
        let result = Config::from_toml(r#"bind_address = "nowhere""#, "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidBindAddress(_)))
        ));
    }

    #[test]
    fn rejects_non_positive_session_lifetime() {
        let result = Config::from_toml("session_lifetime_seconds = 0", "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidSessionLifetime(0)))
        ));
    }

    #[test]
    fn rejects_session_lifetime_beyond_thirty_days() {
        let result = Config::from_toml("session_lifetime_seconds = 100000000000000", "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidSessionLifetime(100_000_000_000_000)))
        ));
        let result = Config::from_toml("session_lifetime_seconds = 9223372036854775807", "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidSessionLifetime(i64::MAX)))
        ));

        let config = Config::from_toml("session_lifetime_seconds = 2592000", "inline").unwrap();
        assert_eq!(config.session_lifetime_seconds, MAX_SESSION_LIFETIME_SECONDS);
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = Config::from_toml("bind_address = ", "inline");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ParseConfigFile(_, _)))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Config::load(Some(PathBuf::from("/nonexistent/registration.toml")));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ReadConfigFile(_, _)))
        ));
    }
}
