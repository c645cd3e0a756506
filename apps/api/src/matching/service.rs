use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::scorer::{MatchOptions, MatchResult, Scorer};
use crate::matching::semantic::{SemanticBackend, SemanticError};

/// How the semantic half of a match was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticOutcome {
    Used,
    /// The backend reports it cannot score at all (no provider configured).
    Unavailable,
    /// Degenerate input; the backend was not called.
    Skipped,
    /// Error or timeout. May succeed on the next call.
    Failed,
}

/// A `MatchResult` plus how its semantic component was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub result: MatchResult,
    pub semantic: SemanticOutcome,
}

impl ScoredMatch {
    /// Lexical-only results caused by a transient backend failure must not be
    /// reused once the backend recovers.
    pub fn is_cacheable(&self) -> bool {
        self.semantic != SemanticOutcome::Failed
    }
}

/// Couples the pure `Scorer` with a semantic backend. The backend call is
/// best-effort: any error or a timeout downgrades the call to lexical-only.
pub struct MatchService {
    scorer: Scorer,
    backend: Arc<dyn SemanticBackend>,
    timeout: Duration,
}

impl MatchService {
    pub fn new(scorer: Scorer, backend: Arc<dyn SemanticBackend>, timeout: Duration) -> Self {
        Self {
            scorer,
            backend,
            timeout,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// `score_match(resume, job_description, options)`. Never fails.
    pub async fn score_match(
        &self,
        resume_text: &str,
        job_description_text: &str,
        options: &MatchOptions,
    ) -> ScoredMatch {
        let (percent, semantic) = if Scorer::is_degenerate(resume_text, job_description_text) {
            (None, SemanticOutcome::Skipped)
        } else {
            self.semantic_percent(resume_text, job_description_text).await
        };

        ScoredMatch {
            result: self
                .scorer
                .score(resume_text, job_description_text, percent, options),
            semantic,
        }
    }

    async fn semantic_percent(
        &self,
        resume_text: &str,
        job_description_text: &str,
    ) -> (Option<f64>, SemanticOutcome) {
        let call = self.backend.similarity(resume_text, job_description_text);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(percent)) => {
                debug!("Semantic score from {}: {percent:.1}", self.backend.name());
                (Some(percent), SemanticOutcome::Used)
            }
            Ok(Err(SemanticError::Unavailable)) => (None, SemanticOutcome::Unavailable),
            Ok(Err(e)) => {
                warn!("Semantic backend {} failed, using lexical score only: {e}", self.backend.name());
                (None, SemanticOutcome::Failed)
            }
            Err(_) => {
                warn!(
                    "Semantic backend {} timed out after {}ms, using lexical score only",
                    self.backend.name(),
                    self.timeout.as_millis()
                );
                (None, SemanticOutcome::Failed)
            }
        }
    }
}
