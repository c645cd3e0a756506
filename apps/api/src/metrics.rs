//! Prometheus metrics recording.
//!
//! Every record function goes through the `metrics` facade; the exporter
//! installed in `main` renders them at `GET /metrics`.

use std::future::Future;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder once per process and returns its
/// handle. Later calls (tests build several routers) get the same handle.
/// If another recorder was installed first, a detached handle is returned.
pub fn install_recorder() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        })
        .clone()
}

/// Records HTTP request metrics labeled by method, path, and status code.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records one AI call outcome. `status` is `"success"` or `"error"`.
pub fn record_ai_call(function: &str, status: &str, duration: Duration) {
    counter!(
        "ai_calls_total",
        "function" => function.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("ai_call_duration_seconds", "function" => function.to_string())
        .record(duration.as_secs_f64());
}

pub fn record_match_score(score: f64) {
    histogram!("job_match_score").record(score);
}

pub fn record_pdf_generation(status: &str) {
    counter!("pdf_generation_total", "status" => status.to_string()).increment(1);
}

pub fn record_cache_hit(prefix: &str) {
    counter!("cache_hits_total", "prefix" => prefix.to_string()).increment(1);
}

pub fn record_cache_miss(prefix: &str) {
    counter!("cache_misses_total", "prefix" => prefix.to_string()).increment(1);
}

/// Awaits `fut`, recording its duration and success/error under `function`.
pub async fn track_ai_call<T, E, F>(function: &str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = fut.await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_ai_call(function, status, start.elapsed());
    result
}

/// Labels requests by route template (`/api/download/:filename`), never the raw
/// URI, so the series count stays bounded by the number of routes.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());
    let start = Instant::now();
    let response = next.run(req).await;
    record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_track_ai_call_passes_result_through() {
        let ok: Result<u32, String> = track_ai_call("unit", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));
        let err: Result<u32, String> = track_ai_call("unit", async { Err("boom".to_string()) }).await;
        assert_eq!(err, Err("boom".to_string()));
    }

    #[test]
    fn test_install_recorder_returns_shared_handle() {
        let first = install_recorder();
        let second = install_recorder();
        record_cache_miss("shared-handle-check");
        assert!(first.render().contains("shared-handle-check"));
        assert!(second.render().contains("shared-handle-check"));
    }
}
