//! Similarity Scorer: blends lexical (TF-IDF cosine) and optional semantic
//! similarity into one bounded match percentage.
//!
//! The scorer is pure: it sees two strings, an already-resolved semantic score
//! (or `None`), and its `MatchConfig`. Obtaining the semantic score is the
//! caller's job (see `MatchService`).

use serde::{Deserialize, Serialize};

use crate::matching::extractor::extract_terms;
use crate::matching::narrative::{narrative_for, INSUFFICIENT_TEXT};
use crate::matching::text::Document;

/// Default weight of the semantic score in the hybrid blend.
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.6;
/// Default number of JD terms treated as target keywords.
pub const DEFAULT_TOP_N_KEYWORDS: usize = 20;

/// Matching policy. Passed in explicitly; the scorer reads no globals.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub top_n_keywords: usize,
    /// Weight of the semantic score when one is available; lexical gets `1 - w`.
    pub semantic_weight: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_n_keywords: DEFAULT_TOP_N_KEYWORDS,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
        }
    }
}

/// Per-call overrides of `MatchConfig`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub top_n_keywords: Option<usize>,
    pub semantic_weight: Option<f64>,
}

impl MatchConfig {
    pub fn with_options(&self, options: &MatchOptions) -> MatchConfig {
        MatchConfig {
            top_n_keywords: options.top_n_keywords.unwrap_or(self.top_n_keywords),
            semantic_weight: options
                .semantic_weight
                .unwrap_or(self.semantic_weight)
                .clamp(0.0, 1.0),
        }
    }
}

/// Result of scoring one resume against one job description. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    pub lexical_score: f64,
    pub semantic_score: Option<f64>,
    pub semantic_available: bool,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub narrative: String,
}

impl MatchResult {
    fn degenerate() -> Self {
        Self {
            overall_score: 0.0,
            lexical_score: 0.0,
            semantic_score: None,
            semantic_available: false,
            matching_keywords: vec![],
            missing_keywords: vec![],
            narrative: INSUFFICIENT_TEXT.to_string(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn to_percent(similarity: f64) -> f64 {
    if similarity.is_finite() {
        (similarity * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Converts a raw cosine similarity in [-1, 1] into a percentage in [0, 100].
pub fn similarity_to_percent(similarity: f64) -> f64 {
    round1(to_percent(similarity))
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: MatchConfig,
}

impl Scorer {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Tokenizes both texts once and reports whether either is empty after normalization.
    pub fn is_degenerate(resume_text: &str, job_description_text: &str) -> bool {
        Document::new(resume_text).is_empty() || Document::new(job_description_text).is_empty()
    }

    /// Scores `resume_text` against `job_description_text`.
    ///
    /// `semantic_percent` is the semantic similarity already scaled to 0–100, or
    /// `None` when the backend is unavailable; in that case the overall score is
    /// exactly the lexical score. Never fails: empty input gives a zero result.
    pub fn score(
        &self,
        resume_text: &str,
        job_description_text: &str,
        semantic_percent: Option<f64>,
        options: &MatchOptions,
    ) -> MatchResult {
        let config = self.config.with_options(options);
        let resume = Document::new(resume_text);
        let job = Document::new(job_description_text);

        if resume.is_empty() || job.is_empty() {
            return MatchResult::degenerate();
        }

        let extraction = extract_terms(&resume, &job, config.top_n_keywords);
        let lexical_score = similarity_to_percent(extraction.resume_vector.cosine(&extraction.job_vector));

        let semantic_score = semantic_percent
            .filter(|s| s.is_finite())
            .map(|s| round1(s.clamp(0.0, 100.0)));

        let overall_score = match semantic_score {
            Some(semantic) => round1(
                (config.semantic_weight * semantic + (1.0 - config.semantic_weight) * lexical_score)
                    .clamp(0.0, 100.0),
            ),
            None => lexical_score,
        };

        let (matching_keywords, missing_keywords): (Vec<_>, Vec<_>) = extraction
            .job_top_terms
            .iter()
            .partition(|ranked| extraction.resume_vector.contains(&ranked.term));

        MatchResult {
            overall_score,
            lexical_score,
            semantic_score,
            semantic_available: semantic_score.is_some(),
            matching_keywords: matching_keywords.into_iter().map(|r| r.display.clone()).collect(),
            missing_keywords: missing_keywords.into_iter().map(|r| r.display.clone()).collect(),
            narrative: narrative_for(overall_score, lexical_score, semantic_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexical(resume: &str, job: &str) -> MatchResult {
        Scorer::default().score(resume, job, None, &MatchOptions::default())
    }

    #[test]
    fn test_identity_scores_near_100_with_no_missing_keywords() {
        let text = "Senior Python developer building FastAPI services on Docker and AWS";
        let result = lexical(text, text);
        assert!(result.lexical_score >= 99.9, "got {}", result.lexical_score);
        assert!(result.missing_keywords.is_empty());
        assert!(!result.matching_keywords.is_empty());
    }

    #[test]
    fn test_empty_resume_is_degenerate() {
        let result = lexical("", "Python developer needed");
        assert_eq!(result.overall_score, 0.0);
        assert!(result.matching_keywords.is_empty());
        assert!(result.missing_keywords.is_empty());
        assert!(!result.semantic_available);
    }

    #[test]
    fn test_whitespace_job_description_is_degenerate() {
        let result = lexical("Python developer", "   \n ");
        assert_eq!(result.overall_score, 0.0);
        assert!(result.matching_keywords.is_empty());
    }

    #[test]
    fn test_stop_word_only_input_is_degenerate() {
        let result = lexical("the and of", "Python developer");
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.narrative, INSUFFICIENT_TEXT);
    }

    #[test]
    fn test_scores_are_bounded() {
        let cases = [
            ("Python", "Python"),
            ("a b c python", "java kotlin"),
            ("Rust Rust Rust Rust", "Rust Go Go Go Go Go Go"),
        ];
        let scorer = Scorer::default();
        for (resume, job) in cases {
            for semantic in [None, Some(-20.0), Some(55.5), Some(140.0)] {
                let r = scorer.score(resume, job, semantic, &MatchOptions::default());
                assert!((0.0..=100.0).contains(&r.overall_score));
                assert!((0.0..=100.0).contains(&r.lexical_score));
                if let Some(s) = r.semantic_score {
                    assert!((0.0..=100.0).contains(&s));
                }
            }
        }
    }

    #[test]
    fn test_fallback_overall_equals_lexical_exactly() {
        let r = lexical(
            "Python developer with Docker",
            "Python FastAPI Docker Kubernetes engineer",
        );
        assert!(!r.semantic_available);
        assert_eq!(r.semantic_score, None);
        assert_eq!(r.overall_score, r.lexical_score);
    }

    #[test]
    fn test_hybrid_blend_uses_configured_weight() {
        let scorer = Scorer::new(MatchConfig {
            top_n_keywords: 20,
            semantic_weight: 0.6,
        });
        let r = scorer.score(
            "Python developer with Docker",
            "Python FastAPI Docker Kubernetes engineer",
            Some(90.0),
            &MatchOptions::default(),
        );
        assert!(r.semantic_available);
        let expected = round1(0.6 * 90.0 + 0.4 * r.lexical_score);
        assert!((r.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_semantic_weight_option_overrides_config() {
        let options = MatchOptions {
            top_n_keywords: None,
            semantic_weight: Some(1.0),
        };
        let r = Scorer::default().score("Python", "Python Docker", Some(42.0), &options);
        assert_eq!(r.overall_score, 42.0);
    }

    #[test]
    fn test_monotonicity_relevant_resume_beats_unrelated() {
        let job = "Python FastAPI Docker";
        let s1 = lexical("Python developer with FastAPI and Docker experience", job).overall_score;
        let s2 = lexical("Graphic designer with Photoshop skills", job).overall_score;
        assert!(s1 > s2, "{s1} should exceed {s2}");
    }

    #[test]
    fn test_keyword_completeness() {
        let options = MatchOptions {
            top_n_keywords: Some(4),
            semantic_weight: None,
        };
        let r = Scorer::default().score(
            "Python and Docker",
            "Python FastAPI Docker Kubernetes",
            None,
            &options,
        );
        let mut matching = r.matching_keywords.clone();
        matching.sort();
        let mut missing = r.missing_keywords.clone();
        missing.sort();
        assert_eq!(matching, vec!["docker", "python"]);
        assert_eq!(missing, vec!["fastapi", "kubernetes"]);
    }

    #[test]
    fn test_keyword_sets_follow_job_description_when_swapped() {
        let a = "Python Docker";
        let b = "Python Kubernetes Terraform";
        let forward = lexical(a, b);
        let swapped = lexical(b, a);
        assert!(forward.missing_keywords.contains(&"kubernetes".to_string()));
        assert!(forward.missing_keywords.contains(&"terraform".to_string()));
        assert_eq!(swapped.missing_keywords, vec!["docker"]);
        assert_eq!(forward.matching_keywords, vec!["python"]);
        assert_eq!(swapped.matching_keywords, vec!["python"]);
    }

    #[test]
    fn test_lexical_score_rounded_to_one_decimal() {
        let r = lexical("Python developer with Docker", "Python FastAPI Docker Kubernetes");
        assert_eq!(r.lexical_score, (r.lexical_score * 10.0).round() / 10.0);
    }
}
