use std::fmt;

use thiserror::Error;

use crate::session::RegistrationState;

#[derive(Debug)]
pub struct DieselResultError(pub diesel::result::Error);

impl fmt::Display for DieselResultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct R2d2Error(pub diesel::r2d2::PoolError);

impl fmt::Display for R2d2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct StdIoError(pub std::io::Error);

impl fmt::Display for StdIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct TomlDeError(pub toml::de::Error);

impl fmt::Display for TomlDeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ReadConfigFile({0}, {1})")]
    ReadConfigFile(StdIoError, String),
    #[error("ParseConfigFile({0}, {1})")]
    ParseConfigFile(TomlDeError, String),
    #[error("InvalidBindAddress({0})")]
    InvalidBindAddress(String),
    #[error("InvalidSessionLifetime({0})")]
    InvalidSessionLifetime(i64),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("BuildConnectionPool({0})")]
    BuildConnectionPool(R2d2Error),
    #[error("GetPooledConnection({0})")]
    GetPooledConnection(R2d2Error),
    #[error("RunMigrations({0})")]
    RunMigrations(String),
    #[error("DatabaseInsertInvitation({0})")]
    DatabaseInsertInvitation(DieselResultError),
    #[error("GatewayUnavailable")]
    GatewayUnavailable,
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("MissingProperties({0})")]
    MissingProperties(String),
    #[error("BindListener({0})")]
    BindListener(StdIoError),
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("ActionNotAvailable({action} in {state:?})")]
    ActionNotAvailable {
        action: &'static str,
        state: RegistrationState,
    },
    #[error("SessionNotFound")]
    SessionNotFound,
    #[error("BlockingTaskFailed({0})")]
    BlockingTaskFailed(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config({0})")]
    Config(#[from] ConfigError),
    #[error("Database({0})")]
    Database(#[from] DatabaseError),
    #[error("Startup({0})")]
    Startup(#[from] StartupError),
    #[error("Registration({0})")]
    Registration(#[from] RegistrationError),
}
