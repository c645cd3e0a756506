use axum::{extract::State, response::Html, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "application": "Resume Builder API",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_configured": state.llm.is_configured(),
        "semantic_backend": state.matcher.backend_name(),
        "cache_enabled": state.cache.is_enabled(),
        "endpoints": {
            "POST /api/generate-resume": "Generate a full AI-optimized resume and PDF",
            "POST /api/generate-pdf": "Generate a PDF from provided resume content",
            "GET /api/download/:filename": "Download a generated PDF",
            "POST /api/analyze-match": "Score a resume against a job description",
            "POST /api/extract-keywords": "Extract ATS keywords from a job description",
            "POST /api/cover-letter": "Generate a cover letter",
            "POST /api/bias-check": "Screen resume sections for biased language",
            "GET /api/cache/stats": "Cache statistics",
            "DELETE /api/cache": "Clear cached responses",
            "GET /health": "Health check",
            "GET /metrics": "Prometheus metrics",
        },
    }))
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.prometheus.render()
}
