use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use clap_serde_derive::ClapSerde;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::ModelServeError;
use crate::error::{HttpErrorResponse, ServeResult};
use crate::extractors::ApiJson;
use crate::predict::{IrisFeatures, PredictHandler, PredictResponse};
use crate::registry::ModelRegistry;
use crate::telemetry::init_telemetry;

mod config;
mod error;
mod extractors;
mod predict;
mod registry;
mod telemetry;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env, default_value = "ModelServe.toml")]
    config_file: String,

    /// OTLP collector endpoint receiving traces and metrics
    #[arg(long, env)]
    otel_endpoint: Option<String>,

    /// Log to console even when an OTLP endpoint is set
    #[arg(long, env, default_value_t = false)]
    console: bool,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<ModelRegistry>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_telemetry(&args.otel_endpoint, args.console);

    let config = match Config::from_toml(&args.config_file) {
        Ok(conf) => conf.merge(args.opt_config),
        Err(err) => {
            if args.config_file == "ModelServe.toml" {
                Config::default().merge(args.opt_config)
            } else {
                exit_err!(
                    1,
                    "Failed to read configuration file {} with error: {}",
                    args.config_file,
                    err
                );
            }
        }
    };

    let registry = Arc::new(ModelRegistry::from_names(config.models));
    if registry.is_empty() {
        warn!("No models registered, every prediction request will be rejected");
    }
    let state = AppState { registry };

    let listener = TcpListener::bind(format!("{}:{}", config.address, config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    info!(
        "Serving {} models: {}",
        state.registry.len(),
        state.registry.model_names().join(", ")
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/models", get(handle_list_models))
        .route("/predict/:model_name", post(handle_predict))
        .fallback(handle_fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

#[derive(Serialize, Debug)]
struct GreetingResponse {
    message: String,
}

#[derive(Serialize, Debug)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize, Debug)]
struct ModelListResponse {
    available_models: Vec<String>,
}

#[axum_macros::debug_handler]
async fn handle_root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello World".to_string(),
    })
}

#[axum_macros::debug_handler]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

#[axum_macros::debug_handler]
async fn handle_list_models(State(state): State<AppState>) -> Json<ModelListResponse> {
    Json(ModelListResponse {
        available_models: state.registry.model_names(),
    })
}

#[axum_macros::debug_handler]
async fn handle_predict(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
    ApiJson(features): ApiJson<IrisFeatures>,
) -> ServeResult<(StatusCode, Json<PredictResponse>)> {
    match state.registry.get(&model_name) {
        Some(model) => Ok((StatusCode::OK, Json(model.run_predict(&features)?))),
        None => bail_serve!(StatusCode::NOT_FOUND, "Model not found"),
    }
}

async fn handle_fallback() -> ModelServeError {
    ModelServeError {
        status: StatusCode::NOT_FOUND,
        message: HttpErrorResponse::from("Not Found"),
    }
}

#[macro_export]
macro_rules! exit_err {
    ($code:expr, $fmt:expr $(, $arg:expr)*) => {
        {
            error!($fmt $(, $arg)*);
            std::process::exit($code);
        }
    };
}
