//! `drivebox-server`: reads `config/`, installs the tracing subscriber and
//! runs the HTTP API until SIGTERM or Ctrl+C.

use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt};

use drivebox_core::config::AppConfig;
use drivebox_core::config::logging::{LogFormat, LoggingConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let env = std::env::var("DRIVEBOX_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("drivebox-server: cannot load configuration for `{env}`: {e}");
            return ExitCode::FAILURE;
        }
    };

    install_subscriber(&config.logging);
    tracing::info!(%env, storage_mode = ?config.storage.mode, "Configuration loaded");

    match drivebox_api::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

fn install_subscriber(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match logging.format {
        LogFormat::Json => builder.json().with_current_span(false).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
