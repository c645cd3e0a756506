//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::bias::{validate_resume_content, ContentValidation};
use crate::errors::AppError;
use crate::generation::content::CandidateProfile;
use crate::generation::generator::{generate_resume, GenerateRequest, GenerateResponse};
use crate::render::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PdfResponse {
    pub message: String,
    pub pdf_path: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractKeywordsRequest {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractKeywordsResponse {
    pub keywords: String,
}

#[derive(Debug, Deserialize)]
pub struct BiasCheckRequest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-resume
///
/// Full pipeline: AI sections → match score → recommendations → PDF.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = generate_resume(&state, request).await?;
    Ok(Json(response))
}

/// POST /api/generate-pdf
///
/// Renders already-written resume content without any AI calls.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<PdfResponse>, AppError> {
    let path = state.renderer.render(&document).await?;
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(PdfResponse {
        message: "PDF generated successfully".to_string(),
        pdf_path: path.display().to_string(),
        filename,
    }))
}

/// GET /api/download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = state.renderer.resolve_download(&filename).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read {}: {e}", path.display())))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

/// POST /api/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let cover_letter = state
        .content()
        .generate_cover_letter(&request.profile, &request.company, &request.job_description)
        .await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/extract-keywords
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Json(request): Json<ExtractKeywordsRequest>,
) -> Result<Json<ExtractKeywordsResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let keywords = state
        .content()
        .extract_ats_keywords(&request.job_description)
        .await?;

    Ok(Json(ExtractKeywordsResponse { keywords }))
}

/// POST /api/bias-check
///
/// Screens resume sections for biased language. No AI involved.
pub async fn handle_bias_check(Json(request): Json<BiasCheckRequest>) -> Json<ContentValidation> {
    Json(validate_resume_content(
        &request.summary,
        &request.skills,
        &request.experience,
    ))
}
