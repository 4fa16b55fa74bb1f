mod app_error;
mod cli;
mod config;
mod controllers;
mod model;
mod repositories;
mod services;

use crate::cli::Cli;
use crate::config::config::Config;
use crate::model::ModelSource;
use crate::repositories::model_file_repository::ModelFileRepository;
use crate::repositories::onnx_repository::OnnxRepository;
use crate::services::classifier_service::{ClassifierService, ClassifierServiceState};
use crate::services::preprocessor::Preprocessor;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    enable_logging(cli.verbose);
    let Some(config) = Config::from_path(cli.config_path) else {
        return Ok(ExitCode::FAILURE);
    };
    let labels = config.class_labels()?;
    let model_config = config.model();

    let preprocessor = Preprocessor::new(model_config.input_size(), model_config.resize_filter());
    info!(
        "Preprocessing to {0}x{0} with {1} resampling",
        model_config.input_size().side(),
        model_config.resize_filter()
    );
    let model_file = model_config
        .persist_uploads()
        .then(|| ModelFileRepository::new(model_config.path()));
    let state: ClassifierServiceState = Arc::new(ClassifierService::new(
        Box::new(OnnxRepository),
        preprocessor,
        labels,
        model_file,
    ));

    load_initial_model(state.clone(), model_config.path()).await;

    let app = controllers::router(state, config.server().max_upload_bytes());

    // run it
    let listener = tokio::net::TcpListener::bind(config.server().bind_address()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(ExitCode::SUCCESS)
}

/// Best effort: the service starts not ready when the configured model cannot be loaded.
async fn load_initial_model(state: ClassifierServiceState, path: &Path) {
    if !path.exists() {
        error!("Model file not found: {}", path.display());
        return;
    }

    let source = ModelSource::Path(path.to_path_buf());
    match tokio::task::spawn_blocking(move || state.replace_model(source)).await {
        Ok(Ok(())) => info!("Model loaded successfully"),
        Ok(Err(err)) => error!("{err}"),
        Err(err) => error!("Model load task failed: {err}"),
    }
}

fn enable_logging(verbose: u8) {
    let log_level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
