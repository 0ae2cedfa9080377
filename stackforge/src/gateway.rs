//! Thin HTTP boundary.
//!
//! Accepts request parameters, translates them into a pipeline
//! `BuildRequest`, and streams the finished archive back. The pipeline
//! itself knows nothing about HTTP.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use stackforge_assemble::Assembler;
use stackforge_core::config::{AssetConfig, EngineConfig, GatewayConfig, PipelineConfig};
use stackforge_core::BuildRequest;
use stackforge_engine::{DockerCli, TagStrategy};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build-time variable names the builder definition expects.
pub const PHP_VERSION_ARG: &str = "PHP_VERSION";
pub const NODE_VERSION_ARG: &str = "NODE_VERSION";

pub struct AppContext {
    pub assembler: Assembler,
}

/// Assembler wired from environment configuration with the docker CLI engine.
pub fn assembler_from_env() -> Assembler {
    let assets = AssetConfig::from_env();
    let engine_cfg = EngineConfig::from_env();
    let pipeline_cfg = PipelineConfig::from_env();
    Assembler::new(
        assets.assets_dir,
        Arc::new(DockerCli::from_config(&engine_cfg)),
        TagStrategy::from_config(&engine_cfg),
    )
    .with_recheck_delay(Duration::from_millis(pipeline_cfg.locate_delay_ms))
}

/// Translate the boolean feature toggles into builder flag tokens, in a
/// fixed order.
pub fn feature_flags(react: bool, phpunit: bool, npm: bool) -> Vec<String> {
    let mut flags = Vec::new();
    if react {
        flags.push("--react".to_string());
    }
    if phpunit {
        flags.push("--phpunit".to_string());
    }
    if npm {
        flags.push("--npm".to_string());
    }
    flags
}

/// Build a validated pipeline request from boundary parameters.
pub fn make_request(
    app_name: &str,
    php_version: &str,
    node_version: &str,
    react: bool,
    phpunit: bool,
    npm: bool,
) -> stackforge_core::Result<BuildRequest> {
    let mut args = BTreeMap::new();
    args.insert(PHP_VERSION_ARG.to_string(), php_version.to_string());
    args.insert(NODE_VERSION_ARG.to_string(), node_version.to_string());
    BuildRequest::new(app_name, args, feature_flags(react, phpunit, npm))
}

/// Run the gateway until the process is terminated.
pub fn serve(bind_override: Option<String>) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve_async(bind_override))
}

async fn serve_async(bind_override: Option<String>) -> Result<()> {
    let bind = bind_override.unwrap_or_else(|| GatewayConfig::from_env().bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address: {bind}"))?;
    let ctx = Arc::new(AppContext {
        assembler: assembler_from_env(),
    });

    info!("gateway listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(ctx)).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/download", get(download))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct DownloadParams {
    app_name: String,
    php_version: String,
    node_version: String,
    #[serde(default)]
    react: bool,
    #[serde(default)]
    phpunit: bool,
    #[serde(default)]
    npm: bool,
}

/// One synchronous assembly per request; the blocking pipeline runs on the
/// blocking pool. A client disconnect does not interrupt an in-progress
/// build — the run completes and its result is discarded.
async fn download(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let request = match make_request(
        &params.app_name,
        &params.php_version,
        &params.node_version,
        params.react,
        params.phpunit,
        params.npm,
    ) {
        Ok(request) => request,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let artifact = match tokio::task::spawn_blocking(move || ctx.assembler.assemble(&request)).await
    {
        Ok(Ok(artifact)) => artifact,
        Ok(Err(e)) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("assembly task failed: {e}"),
            )
                .into_response()
        }
    };

    match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => {
            let filename = format!("{}.zip", artifact.project_name);
            (
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={filename}"),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("archive unreadable at {}: {e}", artifact.path.display()),
        )
            .into_response(),
    }
}
