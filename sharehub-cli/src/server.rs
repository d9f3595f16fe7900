//! On-demand HTTP triggers: render-only preview and render-and-send test.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sharehub_core::Digest;
use sharehub_notify::{PipelineError, PushTransport, build_digest, deliver_digest};

use crate::context::AppContext;

#[derive(Clone)]
pub struct ServerState {
    pub ctx: Arc<AppContext>,
    pub transport: Arc<dyn PushTransport>,
}

fn pipeline_failure(route: &str, err: PipelineError) -> Response {
    match err {
        PipelineError::NotFound => {
            (StatusCode::NOT_FOUND, "No shared hub found.".to_string()).into_response()
        }
        PipelineError::Other(e) => {
            log::error!("{route} failed: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e:#}")).into_response()
        }
    }
}

/// GET /health
async fn health() -> &'static str {
    concat!("ok ", env!("SHAREHUB_BUILD_SHA"))
}

/// Loads and renders the hub on the blocking pool; the store reads files.
async fn load_digest(ctx: Arc<AppContext>) -> Result<Digest, PipelineError> {
    tokio::task::spawn_blocking(move || build_digest(&ctx.store, ctx.today(), &ctx.render_options()))
        .await
        .map_err(|e| PipelineError::Other(anyhow!("digest task failed: {e}")))?
}

/// GET /preview: digest body as plain text, nothing is sent.
async fn preview(State(state): State<ServerState>) -> Response {
    match load_digest(state.ctx.clone()).await {
        Ok(digest) => (StatusCode::OK, digest.body).into_response(),
        Err(e) => pipeline_failure("preview", e),
    }
}

/// GET|POST /test-send: full pipeline, returns the tally.
async fn test_send(State(state): State<ServerState>) -> Response {
    let digest = match load_digest(state.ctx.clone()).await {
        Ok(digest) => digest,
        Err(e) => return pipeline_failure("test-send", e),
    };
    // registrations.json holds a handful of tokens; read inline.
    match deliver_digest(state.transport.as_ref(), &state.ctx.store, &digest).await {
        Ok(tally) => {
            log::info!("test-send: {}", tally.summary());
            (StatusCode::OK, format!("{}\n{}", digest.title, tally.summary())).into_response()
        }
        Err(e) => pipeline_failure("test-send", PipelineError::Other(e)),
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/preview", get(preview))
        .route("/test-send", get(test_send).post(test_send))
        .with_state(state)
}

pub async fn serve(ctx: Arc<AppContext>, addr: &str) -> Result<()> {
    let transport: Arc<dyn PushTransport> = Arc::from(ctx.transport(false)?);
    let app = router(ServerState { ctx, transport });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    log::info!("sharehub listening on http://{addr}");
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
