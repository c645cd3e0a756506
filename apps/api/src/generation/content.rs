//! AI content operations: summary, skills, experience, cover letter, ATS
//! keywords and recommendations.
//!
//! Each operation is cached by its inputs (except recommendations, which
//! depend on a fresh match score) and timed under its own metrics label.
//! Summary and experience text is screened for biased language and repaired.

use serde::Deserialize;
use tracing::warn;

use crate::bias::{fix_bias_issues, scan_for_bias};
use crate::cache::ResponseCache;
use crate::generation::prompts::{
    ATS_KEYWORDS_PROMPT_TEMPLATE, COVER_LETTER_PROMPT_TEMPLATE, EXPERIENCE_PROMPT_TEMPLATE,
    RECOMMENDATIONS_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{ANALYST_SYSTEM, RESUME_WRITER_SYSTEM};
use crate::llm_client::{GeminiClient, LlmError};
use crate::metrics::track_ai_call;

/// The candidate fields every prose prompt draws from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub target_role: String,
}

pub struct ContentGenerator<'a> {
    llm: &'a GeminiClient,
    cache: &'a ResponseCache,
    ttl_secs: u64,
}

impl<'a> ContentGenerator<'a> {
    pub fn new(llm: &'a GeminiClient, cache: &'a ResponseCache, ttl_secs: u64) -> Self {
        Self {
            llm,
            cache,
            ttl_secs,
        }
    }

    async fn cached_call(
        &self,
        function: &str,
        prefix: &str,
        parts: &[&str],
        ttl_secs: u64,
        prompt: String,
        system: &str,
    ) -> Result<String, LlmError> {
        self.cache
            .cached(prefix, parts, ttl_secs, || {
                track_ai_call(function, self.llm.generate(&prompt, system))
            })
            .await
    }

    pub async fn generate_summary(&self, profile: &CandidateProfile) -> Result<String, LlmError> {
        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{name}", &profile.name)
            .replace("{skills}", &profile.skills)
            .replace("{experience}", &profile.experience)
            .replace("{target_role}", &profile.target_role);
        let text = self
            .cached_call(
                "generate_resume_summary",
                "resume_summary",
                &[
                    profile.name.as_str(),
                    profile.skills.as_str(),
                    profile.experience.as_str(),
                    profile.target_role.as_str(),
                ],
                self.ttl_secs,
                prompt,
                RESUME_WRITER_SYSTEM,
            )
            .await?;
        Ok(screen("summary", text))
    }

    pub async fn optimize_skills(&self, skills: &str, target_role: &str) -> Result<String, LlmError> {
        let prompt = SKILLS_PROMPT_TEMPLATE
            .replace("{skills}", skills)
            .replace("{target_role}", target_role);
        self.cached_call(
            "optimize_skills",
            "optimize_skills",
            &[skills, target_role],
            self.ttl_secs,
            prompt,
            RESUME_WRITER_SYSTEM,
        )
        .await
    }

    pub async fn enhance_experience(
        &self,
        experience: &str,
        target_role: &str,
    ) -> Result<String, LlmError> {
        let prompt = EXPERIENCE_PROMPT_TEMPLATE
            .replace("{experience}", experience)
            .replace("{target_role}", target_role);
        let text = self
            .cached_call(
                "enhance_experience",
                "enhance_experience",
                &[experience, target_role],
                self.ttl_secs,
                prompt,
                RESUME_WRITER_SYSTEM,
            )
            .await?;
        Ok(screen("experience", text))
    }

    pub async fn generate_cover_letter(
        &self,
        profile: &CandidateProfile,
        company: &str,
        job_description: &str,
    ) -> Result<String, LlmError> {
        let company = if company.trim().is_empty() {
            "the company"
        } else {
            company
        };
        let prompt = COVER_LETTER_PROMPT_TEMPLATE
            .replace("{name}", &profile.name)
            .replace("{skills}", &profile.skills)
            .replace("{experience}", &profile.experience)
            .replace("{target_role}", &profile.target_role)
            .replace("{company}", company)
            .replace("{job_description}", job_description);
        self.cached_call(
            "generate_cover_letter",
            "cover_letter",
            &[
                profile.name.as_str(),
                profile.skills.as_str(),
                profile.experience.as_str(),
                profile.target_role.as_str(),
                company,
                job_description,
            ],
            self.ttl_secs,
            prompt,
            RESUME_WRITER_SYSTEM,
        )
        .await
    }

    /// Job descriptions change less often than profiles, so keywords live twice as long.
    pub async fn extract_ats_keywords(&self, job_description: &str) -> Result<String, LlmError> {
        let prompt = ATS_KEYWORDS_PROMPT_TEMPLATE.replace("{job_description}", job_description);
        self.cached_call(
            "extract_ats_keywords",
            "ats_keywords",
            &[job_description],
            self.ttl_secs * 2,
            prompt,
            ANALYST_SYSTEM,
        )
        .await
    }

    pub async fn generate_recommendations(
        &self,
        summary: &str,
        skills: &str,
        experience: &str,
        job_description: &str,
        match_score: f64,
    ) -> Result<Vec<String>, LlmError> {
        let prompt = RECOMMENDATIONS_PROMPT_TEMPLATE
            .replace("{summary}", summary)
            .replace("{skills}", skills)
            .replace("{experience}", experience)
            .replace("{job_description}", job_description)
            .replace("{match_score}", &format!("{match_score:.1}"));
        let raw = track_ai_call(
            "generate_recommendations",
            self.llm.generate(&prompt, ANALYST_SYSTEM),
        )
        .await?;
        Ok(parse_recommendations(&raw))
    }
}

/// Repairs biased phrasing in generated prose; clean text passes through untouched.
fn screen(section: &str, text: String) -> String {
    let report = scan_for_bias(&text);
    if report.is_safe {
        return text;
    }
    warn!(
        "Bias detected in generated {section}: {} issues, applying fixes",
        report.total_issues
    );
    fix_bias_issues(&text)
}

/// Splits a numbered list ("1. ...", "2) ...") into items. If nothing parses,
/// the whole response becomes the single item.
pub fn parse_recommendations(raw: &str) -> Vec<String> {
    let items: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | ' '))
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        vec![raw.trim().to_string()]
    } else {
        items
    }
}
