use spider_bot_registration::{
    config::Config, registration_manager::RegistrationManager,
    registration_server::RegistrationServer,
};
use std::{
    error::Error,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "debug-logging")]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(feature = "debug-logging"))]
const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_FILE_PREFIX: &str = "registration.log";

fn init_logging(log_directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let (file_layer, guard) = match log_directory {
        Some(log_directory) => {
            let appender = tracing_appender::rolling::daily(log_directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                ),
                Some(guard),
            )
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config: Config = Config::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    //dropping the guard flushes the file writer
    let _log_guard: Option<WorkerGuard> = init_logging(config.log_directory.as_deref());

    let gateway = RegistrationManager::gateway_from_config(&config)?;
    let registration_server = RegistrationServer::builder()
        .config(&config)?
        .gateway(gateway)
        .start_server()
        .await?;

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for shutdown signal: {}", err);
    }
    info!("Shutting down");
    registration_server.signals.stop();

    Ok(())
}
