use std::convert::Infallible;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::generation::content::ContentGenerator;
use crate::llm_client::GeminiClient;
use crate::matching::{MatchOptions, MatchResult, MatchService, ScoredMatch};
use crate::metrics;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: GeminiClient,
    /// Scorer plus the semantic backend chosen at startup (SEMANTIC_BACKEND).
    pub matcher: Arc<MatchService>,
    pub cache: ResponseCache,
    pub renderer: PdfRenderer,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub fn content(&self) -> ContentGenerator<'_> {
        ContentGenerator::new(&self.llm, &self.cache, self.config.cache_ttl_secs)
    }

    /// Scores a resume against a job description, reusing a cached result
    /// for identical inputs and options. Results degraded by a failed semantic
    /// call are returned but not cached.
    pub async fn score_match(
        &self,
        resume_text: &str,
        job_description_text: &str,
        options: &MatchOptions,
    ) -> MatchResult {
        let options_key = serde_json::to_string(options).unwrap_or_default();
        let scored: Result<ScoredMatch, Infallible> = self
            .cache
            .cached_when(
                "match",
                &[resume_text, job_description_text, &options_key],
                self.config.cache_ttl_secs,
                || async {
                    let scored = self
                        .matcher
                        .score_match(resume_text, job_description_text, options)
                        .await;
                    metrics::record_match_score(scored.result.overall_score);
                    Ok(scored)
                },
                ScoredMatch::is_cacheable,
            )
            .await;
        match scored {
            Ok(scored) => scored.result,
            Err(never) => match never {},
        }
    }
}
