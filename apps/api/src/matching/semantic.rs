//! Semantic similarity backends.
//!
//! `MatchService` holds an `Arc<dyn SemanticBackend>` chosen at startup:
//! `EmbeddingBackend` compares Gemini text embeddings, `NullBackend` always
//! reports itself unavailable so scoring falls back to lexical-only.

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::{GeminiClient, LlmError};
use crate::matching::scorer::similarity_to_percent;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("no semantic backend configured")]
    Unavailable,

    #[error("embedding request failed: {0}")]
    Embedding(#[from] LlmError),

    #[error("embedding dimensions differ ({0} vs {1})")]
    DimensionMismatch(usize, usize),
}

/// Computes a semantic similarity percentage (0–100) between two texts.
#[async_trait]
pub trait SemanticBackend: Send + Sync {
    /// Short label reported in logs and health output.
    fn name(&self) -> &'static str;

    async fn similarity(&self, resume: &str, job_description: &str) -> Result<f64, SemanticError>;
}

/// Backend used when no embedding provider is configured.
pub struct NullBackend;

#[async_trait]
impl SemanticBackend for NullBackend {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn similarity(&self, _resume: &str, _job_description: &str) -> Result<f64, SemanticError> {
        Err(SemanticError::Unavailable)
    }
}

/// Sentence-embedding backend over the Gemini `embedContent` API.
pub struct EmbeddingBackend {
    llm: GeminiClient,
}

impl EmbeddingBackend {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SemanticBackend for EmbeddingBackend {
    fn name(&self) -> &'static str {
        "gemini-embedding"
    }

    async fn similarity(&self, resume: &str, job_description: &str) -> Result<f64, SemanticError> {
        let (resume_embedding, job_embedding) =
            tokio::try_join!(self.llm.embed(resume), self.llm.embed(job_description))?;
        let cosine = cosine_similarity(&resume_embedding, &job_embedding)?;
        Ok(similarity_to_percent(cosine))
    }
}

/// Cosine similarity of two dense vectors. Zero vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SemanticError> {
    if a.len() != b.len() {
        return Err(SemanticError::DimensionMismatch(a.len(), b.len()));
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / denom)
}
