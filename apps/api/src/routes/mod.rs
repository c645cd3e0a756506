pub mod cache;
pub mod health;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::generation::handlers;
use crate::matching::handlers::handle_analyze_match;
use crate::metrics::metrics_middleware;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/api", get(health::api_info))
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        // Resume generation
        .route("/api/generate-resume", post(handlers::handle_generate_resume))
        .route("/api/generate-pdf", post(handlers::handle_generate_pdf))
        .route("/api/download/:filename", get(handlers::handle_download))
        .route("/api/cover-letter", post(handlers::handle_cover_letter))
        .route("/api/extract-keywords", post(handlers::handle_extract_keywords))
        .route("/api/bias-check", post(handlers::handle_bias_check))
        // Matching
        .route("/api/analyze-match", post(handle_analyze_match))
        // Cache admin
        .route("/api/cache/stats", get(cache::cache_stats))
        .route("/api/cache", delete(cache::clear_cache))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(dir: &std::path::Path) -> Router {
        build_router(test_state(dir, "typst-binary-that-does-not-exist"))
    }

    async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(app(dir.path()), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(app(dir.path()), Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_api_info_reports_integrations() {
        let dir = tempfile::tempdir().unwrap();
        let body = json_body(send(app(dir.path()), Method::GET, "/api", None).await).await;
        assert_eq!(body["ai_configured"], false);
        assert_eq!(body["semantic_backend"], "none");
        assert_eq!(body["cache_enabled"], false);
    }

    #[tokio::test]
    async fn test_analyze_match_lexical_only() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(
            app(dir.path()),
            Method::POST,
            "/api/analyze-match",
            Some(json!({
                "resume_text": "Python developer with FastAPI and Docker experience",
                "job_description": "Python FastAPI Docker Kubernetes"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["semantic_available"], false);
        assert!(body["semantic_score"].is_null());
        assert_eq!(body["score"], body["lexical_score"]);
        let missing: Vec<&str> = body["missing_keywords"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(missing, vec!["kubernetes"]);
        assert!(body["analysis"].as_str().unwrap().contains('%'));
    }

    #[tokio::test]
    async fn test_analyze_match_rejects_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(
            app(dir.path()),
            Method::POST,
            "/api/analyze-match",
            Some(json!({"resume_text": "  ", "job_description": "Python"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_keywords_validation_and_ai_failure() {
        let dir = tempfile::tempdir().unwrap();
        let empty = send(
            app(dir.path()),
            Method::POST,
            "/api/extract-keywords",
            Some(json!({"job_description": ""})),
        )
        .await;
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let unconfigured = send(
            app(dir.path()),
            Method::POST,
            "/api/extract-keywords",
            Some(json!({"job_description": "Senior Rust engineer"})),
        )
        .await;
        assert_eq!(unconfigured.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(unconfigured).await;
        assert_eq!(body["error"]["code"], "AI_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_cover_letter_without_ai_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(
            app(dir.path()),
            Method::POST,
            "/api/cover-letter",
            Some(json!({
                "name": "Jane",
                "company": "Acme",
                "job_description": "Rust engineer"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_bias_check() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(
            app(dir.path()),
            Method::POST,
            "/api/bias-check",
            Some(json!({"summary": "He is a digital native", "skills": "Rust"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["overall_safe"], false);
        assert_eq!(body["summary"]["total_issues"], 2);
        assert_eq!(body["skills"]["is_safe"], true);
        assert_eq!(body["summary"]["issues"][0]["type"], "gender");
    }

    #[tokio::test]
    async fn test_generate_pdf_without_compiler_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(
            app(dir.path()),
            Method::POST,
            "/api/generate-pdf",
            Some(json!({"name": "Jane", "summary": "Engineer"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "RENDER_ERROR");
    }

    #[tokio::test]
    async fn test_download_missing_and_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = send(app(dir.path()), Method::GET, "/api/download/nope.pdf", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        std::fs::write(dir.path().join("resume_jane.pdf"), b"%PDF-1.7").unwrap();
        let found = send(
            app(dir.path()),
            Method::GET,
            "/api/download/resume_jane.pdf",
            None,
        )
        .await;
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(found.headers()[header::CONTENT_TYPE], "application/pdf");
        let bytes = to_bytes(found.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_download_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(app(dir.path()), Method::GET, "/api/download/notes.txt", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cache_admin_without_redis() {
        let dir = tempfile::tempdir().unwrap();
        let stats = json_body(send(app(dir.path()), Method::GET, "/api/cache/stats", None).await).await;
        assert_eq!(stats, json!({"available": false}));

        let cleared = send(app(dir.path()), Method::DELETE, "/api/cache?pattern=match:*", None).await;
        assert_eq!(cleared.status(), StatusCode::OK);
        assert_eq!(
            json_body(cleared).await,
            json!({"pattern": "match:*", "removed": 0})
        );
    }

    #[tokio::test]
    async fn test_metrics_endpoint_renders_text() {
        let dir = tempfile::tempdir().unwrap();
        let response = send(app(dir.path()), Method::GET, "/metrics", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_metrics_use_route_template() {
        let dir = tempfile::tempdir().unwrap();
        let router = app(dir.path());
        for i in 0..20 {
            let uri = format!("/api/download/series-check-{i}.pdf");
            let response = send(router.clone(), Method::GET, &uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        let unknown = send(router, Method::GET, "/no-such-route-series-check", None).await;
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let rendered = crate::metrics::install_recorder().render();
        assert!(!rendered.contains("series-check"));
        let download_404_series = rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .filter(|line| line.contains(r#"path="/api/download/:filename""#))
            .filter(|line| line.contains(r#"status="404""#))
            .count();
        assert_eq!(download_404_series, 1);
        assert!(rendered.contains(r#"path="unmatched""#));
    }
}
