//! Resume Generation: orchestrates the full generation pipeline.
//!
//! Flow: summary + skills + experience (concurrently, each with a deterministic
//!       fallback) → match score → recommendations → PDF → return response.
//!
//! AI failures never fail the request; only invalid input (400) and PDF
//! rendering (500) do.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::content::CandidateProfile;
use crate::matching::MatchOptions;
use crate::render::ResumeDocument;
use crate::state::AppState;

const DEFAULT_SKILLS: &str = "General professional skills";
const DEFAULT_EXPERIENCE: &str = "Professional experience";
const DEFAULT_TARGET_ROLE: &str = "Professional";

/// Returned when recommendation generation fails.
pub const FALLBACK_RECOMMENDATIONS: [&str; 3] = [
    "Mirror the job description's key terms in your skills and experience sections.",
    "Consider adding more specific metrics and achievements.",
    "Highlight collaborative projects and team leadership.",
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for resume generation. Only `name` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub job_description: String,
}

/// Response from the generation pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub summary: String,
    pub optimized_skills: String,
    pub enhanced_experience: String,
    pub job_match_score: f64,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub pdf_path: String,
    pub filename: String,
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn fallback_summary(target_role: &str, skills: &str, experience: &str) -> String {
    format!("Experienced professional seeking a {target_role} role. Skilled in {skills}. {experience}")
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full resume generation pipeline.
///
/// Steps:
/// 1. summary, skills and experience generated concurrently (fallback per section)
/// 2. match score of the generated resume against the JD (if a JD was given)
/// 3. recommendations (if a JD was given; fixed fallback list on AI failure)
/// 4. PDF render
pub async fn generate_resume(
    state: &AppState,
    request: GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    info!("Generating resume for {}", request.name);

    let skills = or_default(&request.skills, DEFAULT_SKILLS);
    let experience = or_default(&request.experience, DEFAULT_EXPERIENCE);
    let target_role = or_default(&request.target_role, DEFAULT_TARGET_ROLE);

    // Step 1: AI sections
    let content = state.content();
    let profile = CandidateProfile {
        name: request.name.clone(),
        skills: skills.to_string(),
        experience: experience.to_string(),
        target_role: target_role.to_string(),
    };
    let (summary, optimized_skills, enhanced_experience) = tokio::join!(
        content.generate_summary(&profile),
        content.optimize_skills(skills, target_role),
        content.enhance_experience(experience, target_role),
    );

    let summary = summary.unwrap_or_else(|e| {
        warn!("AI summary generation failed, using fallback: {e}");
        fallback_summary(target_role, skills, experience)
    });
    let optimized_skills = optimized_skills.unwrap_or_else(|e| {
        warn!("AI skills optimization failed, using fallback: {e}");
        skills.to_string()
    });
    let enhanced_experience = enhanced_experience.unwrap_or_else(|e| {
        warn!("AI experience enhancement failed, using fallback: {e}");
        experience.to_string()
    });

    // Steps 2-3: match + recommendations
    let job_description = request.job_description.trim();
    let (job_match_score, matching_keywords, missing_keywords, recommendations) =
        if job_description.is_empty() {
            (0.0, Vec::new(), Vec::new(), Vec::new())
        } else {
            let resume_text = format!("{summary}\n{optimized_skills}\n{enhanced_experience}");
            let result = state
                .score_match(&resume_text, job_description, &MatchOptions::default())
                .await;
            info!("Match score for {}: {:.1}", request.name, result.overall_score);

            let recommendations = content
                .generate_recommendations(
                    &summary,
                    &optimized_skills,
                    &enhanced_experience,
                    job_description,
                    result.overall_score,
                )
                .await
                .unwrap_or_else(|e| {
                    warn!("Recommendation generation failed, using fallback: {e}");
                    FALLBACK_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
                });

            (
                result.overall_score,
                result.matching_keywords,
                result.missing_keywords,
                recommendations,
            )
        };

    // Step 4: PDF
    let pdf_path = state
        .renderer
        .render(&ResumeDocument {
            name: request.name.clone(),
            email: request.email,
            phone: request.phone,
            summary: summary.clone(),
            skills: optimized_skills.clone(),
            experience: enhanced_experience.clone(),
            education: request.education,
        })
        .await?;

    let filename = pdf_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(GenerateResponse {
        summary,
        optimized_skills,
        enhanced_experience,
        job_match_score,
        matching_keywords,
        missing_keywords,
        recommendations,
        pdf_path: pdf_path.display().to_string(),
        filename,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    fn request() -> GenerateRequest {
        GenerateRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
            skills: "Python, FastAPI, Docker".to_string(),
            experience: "Backend developer at Acme building Python APIs".to_string(),
            education: String::new(),
            target_role: "Backend Engineer".to_string(),
            job_description: "Python FastAPI Docker Kubernetes engineer".to_string(),
        }
    }

    #[test]
    fn test_fallback_summary_shape() {
        assert_eq!(
            fallback_summary("Professional", DEFAULT_SKILLS, DEFAULT_EXPERIENCE),
            "Experienced professional seeking a Professional role. \
             Skilled in General professional skills. Professional experience"
        );
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), "true");
        let err = generate_resume(
            &state,
            GenerateRequest {
                name: "  ".to_string(),
                ..request()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ai_failures_fall_back_per_section() {
        let dir = tempfile::tempdir().unwrap();
        // `true` exits 0, standing in for a successful compile
        let state = test_state(dir.path(), "true");
        let response = generate_resume(&state, request()).await.unwrap();

        assert_eq!(
            response.summary,
            fallback_summary(
                "Backend Engineer",
                "Python, FastAPI, Docker",
                "Backend developer at Acme building Python APIs"
            )
        );
        assert_eq!(response.optimized_skills, "Python, FastAPI, Docker");
        assert!(response.job_match_score > 0.0);
        assert!(response.matching_keywords.contains(&"python".to_string()));
        assert!(response.missing_keywords.contains(&"kubernetes".to_string()));
        assert_eq!(response.recommendations.len(), FALLBACK_RECOMMENDATIONS.len());
        assert!(response.filename.starts_with("resume_Jane_Doe_"));
        assert!(response.filename.ends_with(".pdf"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_no_job_description_skips_matching() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), "true");
        let response = generate_resume(
            &state,
            GenerateRequest {
                job_description: String::new(),
                skills: String::new(),
                ..request()
            },
        )
        .await
        .unwrap();
        assert_eq!(response.job_match_score, 0.0);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.optimized_skills, DEFAULT_SKILLS);
    }

    #[tokio::test]
    async fn test_render_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), "typst-binary-that-does-not-exist");
        let err = generate_resume(&state, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
