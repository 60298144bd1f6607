//! Local upload page: the settings form, previews and a data-URI download.

pub mod form;
pub mod page;

use std::{ffi::OsString, net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Html,
    routing::get,
};

use crate::{
    foundation::error::{ArtError, ArtResult},
    pipeline::{Generation, Generator, GeneratorSettings, Upload},
    request::params::GenerationParams,
    tools::discover::Toolchain,
};
use form::FormSubmission;
use page::Outcome;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
    pub generator: GeneratorSettings,
    /// Where tools are looked up per request; `None` means `PATH`.
    pub search_path: Option<OsString>,
}

struct AppState {
    settings: GeneratorSettings,
    search_path: Option<OsString>,
}

pub fn router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        settings: config.generator.clone(),
        search_path: config.search_path.clone(),
    });
    Router::new()
        .route("/", get(index))
        .route("/generate", get(index).post(generate))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!("serving on http://{addr}");

    axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn index() -> Html<String> {
    Html(page::render(&GenerationParams::default(), Outcome::Blank))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let submission = match FormSubmission::read(multipart).await {
        Ok(s) => s,
        Err(e) => return failure_page(&GenerationParams::default(), &e),
    };
    // Re-fill the form with what was sent, even when parsing fails later.
    let shown = submission.params().unwrap_or_default();
    let (upload, params) = match submission.into_request() {
        Ok(req) => req,
        Err(e) => return failure_page(&shown, &e),
    };

    match run_request(&state, upload, params.clone()).await {
        Ok(generation) => (
            StatusCode::OK,
            Html(page::render(&params, Outcome::Done(&generation))),
        ),
        Err(e) => failure_page(&params, &e),
    }
}

/// Validates the environment, then runs the blocking pipeline off the async
/// workers.
async fn run_request(
    state: &AppState,
    upload: Upload,
    params: GenerationParams,
) -> ArtResult<Generation> {
    let settings = state.settings.clone();
    let search_path = state.search_path.clone();
    tokio::task::spawn_blocking(move || {
        let toolchain = match &search_path {
            Some(dirs) => Toolchain::discover_in(dirs)?,
            None => Toolchain::discover()?,
        };
        let generator = Generator::new(toolchain, settings);
        generator.generate(&upload, &params)
    })
    .await
    .context("generation task panicked")?
}

fn failure_page(params: &GenerationParams, err: &ArtError) -> (StatusCode, Html<String>) {
    tracing::warn!(error = %err, "request failed");
    (status_for(err), Html(page::render(params, Outcome::Failed(err))))
}

pub fn status_for(err: &ArtError) -> StatusCode {
    match err {
        ArtError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ArtError::MissingDependency(_) => StatusCode::SERVICE_UNAVAILABLE,
        ArtError::ToolFailed { .. } | ArtError::Artifact(_) | ArtError::Other(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
