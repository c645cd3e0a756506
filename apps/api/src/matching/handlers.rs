//! Axum route handler for standalone match analysis.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::MatchOptions;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeMatchRequest {
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub options: MatchOptions,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMatchResponse {
    pub score: f64,
    pub lexical_score: f64,
    pub semantic_score: Option<f64>,
    pub semantic_available: bool,
    pub top_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub analysis: String,
}

/// POST /api/analyze-match
///
/// Scores a resume against a job description. The semantic component is
/// best-effort; `semantic_available` reports whether it contributed.
pub async fn handle_analyze_match(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeMatchRequest>,
) -> Result<Json<AnalyzeMatchResponse>, AppError> {
    if request.resume_text.trim().is_empty() || request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text and job_description cannot be empty".to_string(),
        ));
    }

    let result = state
        .score_match(&request.resume_text, &request.job_description, &request.options)
        .await;

    Ok(Json(AnalyzeMatchResponse {
        score: result.overall_score,
        lexical_score: result.lexical_score,
        semantic_score: result.semantic_score,
        semantic_available: result.semantic_available,
        top_keywords: result.matching_keywords,
        missing_keywords: result.missing_keywords,
        analysis: result.narrative,
    }))
}
