mod bias;
mod cache;
mod config;
mod errors;
mod generation;
mod llm_client;
mod matching;
mod metrics;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::ResponseCache;
use crate::config::{Config, SemanticBackendKind};
use crate::llm_client::GeminiClient;
use crate::matching::{EmbeddingBackend, MatchService, NullBackend, Scorer, SemanticBackend};
use crate::render::PdfRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus recorder
    let prometheus = metrics::install_recorder();

    // Initialize LLM client
    let llm = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_embedding_model.clone(),
    );
    if llm.is_configured() {
        info!("Gemini client initialized (model: {})", llm.model());
    } else {
        warn!("GEMINI_API_KEY not set; AI sections will use fallbacks");
    }

    // Initialize matcher (semantic backend swappable via SEMANTIC_BACKEND)
    let backend: Arc<dyn SemanticBackend> = match config.semantic_backend {
        SemanticBackendKind::Gemini if llm.is_configured() => {
            Arc::new(EmbeddingBackend::new(llm.clone()))
        }
        SemanticBackendKind::Gemini => {
            warn!("SEMANTIC_BACKEND=gemini requires GEMINI_API_KEY; matching is lexical-only");
            Arc::new(NullBackend)
        }
        SemanticBackendKind::None => Arc::new(NullBackend),
    };
    let matcher = Arc::new(MatchService::new(
        Scorer::new(config.match_config()),
        backend,
        Duration::from_millis(config.semantic_timeout_ms),
    ));
    info!(
        "Matcher initialized (semantic backend: {}, weight: {})",
        matcher.backend_name(),
        config.semantic_weight
    );

    // Initialize Redis cache (optional)
    let cache = ResponseCache::new(config.redis_url.as_deref());

    // Initialize PDF renderer
    let renderer = PdfRenderer::new(config.output_dir.clone(), config.typst_bin.clone());
    info!(
        "PDF renderer initialized (output: {}, compiler: {})",
        renderer.output_dir().display(),
        config.typst_bin
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        matcher,
        cache,
        renderer,
        prometheus,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
