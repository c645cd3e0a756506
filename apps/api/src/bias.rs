//! Bias screening for generated resume prose.
//!
//! Flags gendered, age-related, disability-related and coded discriminatory
//! language. `fix_bias_issues` repairs the mechanical cases (pronouns, birth
//! years, stated ages); everything else is only reported.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, warn};

const PENALTY_PER_ISSUE: f64 = 15.0;

const GENDERED_TERMS: &[&str] = &[
    "he", "his", "him", "himself", "guy", "guys", "men", "man", "manly", "she", "her", "hers",
    "herself", "gal", "gals", "women", "woman",
];

const DISABILITY_TERMS: &[&str] = &[
    "handicapped",
    "disabled",
    "wheelchair",
    "blind",
    "deaf",
    "mental illness",
    "bipolar",
    "schizophrenia",
    "crazy",
    "insane",
    "retarded",
    "mentally challenged",
];

const DISCRIMINATORY_TERMS: &[&str] = &["overqualified", "digital native", "recent graduate"];

static AGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:19|20)\d{2}\b",
        r"\b\d{2}\s*years?\s*old\b",
        r"\byoung\b",
        r"\byouthful\b",
        r"\bold\b",
        r"\belderly\b",
        r"\bage\b\s*\d+",
    ]
    .iter()
    .filter_map(|p| Regex::new(&format!("(?i){p}")).ok())
    .collect()
});

static PRONOUN_FIXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("he", "they"),
        ("she", "they"),
        ("his", "their"),
        ("her", "their"),
        ("him", "them"),
        ("himself", "themselves"),
        ("herself", "themselves"),
    ]
    .iter()
    .filter_map(|(word, replacement)| {
        Regex::new(&format!(r"(?i)\b{word}\b"))
            .ok()
            .map(|re| (re, *replacement))
    })
    .collect()
});

static BIRTH_YEAR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:born in |birth year: ?)(?:19|20)\d{2}\b").ok());
static STATED_AGE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\b\d{2}\s*years?\s*old\b").ok());
static HORIZONTAL_WS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[ \t]+").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasCategory {
    Gender,
    Age,
    Disability,
    Discriminatory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasIssue {
    #[serde(rename = "type")]
    pub category: BiasCategory,
    pub term: String,
    pub severity: Severity,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiasReport {
    pub is_safe: bool,
    pub issues: Vec<BiasIssue>,
    pub score: f64,
    pub total_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentValidation {
    pub overall_safe: bool,
    pub summary: BiasReport,
    pub skills: BiasReport,
    pub experience: BiasReport,
    pub total_issues: usize,
}

fn contains_word(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

pub fn scan_for_bias(text: &str) -> BiasReport {
    let lower = text.to_lowercase();
    let mut issues = Vec::new();

    for term in GENDERED_TERMS {
        if contains_word(&lower, term) {
            issues.push(BiasIssue {
                category: BiasCategory::Gender,
                term: term.to_string(),
                severity: Severity::Medium,
                suggestion: format!(
                    "Use gender-neutral language instead of '{term}' (e.g., 'they', 'their')"
                ),
            });
        }
    }

    for pattern in AGE_PATTERNS.iter() {
        for m in pattern.find_iter(&lower) {
            issues.push(BiasIssue {
                category: BiasCategory::Age,
                term: m.as_str().to_string(),
                severity: Severity::High,
                suggestion: "Avoid mentioning age, birth year, or age-related terms".to_string(),
            });
        }
    }

    for term in DISABILITY_TERMS {
        if contains_word(&lower, term) {
            issues.push(BiasIssue {
                category: BiasCategory::Disability,
                term: term.to_string(),
                severity: Severity::High,
                suggestion: format!("Avoid mentioning '{term}'; focus on skills and achievements"),
            });
        }
    }

    for term in DISCRIMINATORY_TERMS {
        if contains_word(&lower, term) {
            issues.push(BiasIssue {
                category: BiasCategory::Discriminatory,
                term: term.to_string(),
                severity: Severity::Medium,
                suggestion: format!("Remove '{term}'; it may indicate bias"),
            });
        }
    }

    if !issues.is_empty() {
        warn!("Detected {} bias issues in generated content", issues.len());
        for issue in &issues {
            debug!("  - {:?}: {}", issue.category, issue.term);
        }
    }

    let total_issues = issues.len();
    BiasReport {
        is_safe: total_issues == 0,
        score: (100.0 - PENALTY_PER_ISSUE * total_issues as f64).max(0.0),
        issues,
        total_issues,
    }
}

/// Rewrites gendered pronouns to "they" forms and strips birth years and
/// stated ages. Line breaks survive so bullet lists keep their shape.
pub fn fix_bias_issues(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut fixed = text.to_string();
    for (pattern, replacement) in PRONOUN_FIXES.iter() {
        fixed = pattern
            .replace_all(&fixed, |caps: &Captures| match_case(&caps[0], replacement))
            .into_owned();
    }
    for pattern in [&*BIRTH_YEAR, &*STATED_AGE].into_iter().flatten() {
        fixed = pattern.replace_all(&fixed, "").into_owned();
    }

    let lines: Vec<String> = fixed
        .lines()
        .map(|line| match &*HORIZONTAL_WS {
            Some(ws) => ws.replace_all(line.trim(), " ").into_owned(),
            None => line.trim().to_string(),
        })
        .collect();
    lines.join("\n").trim().to_string()
}

/// Capitalizes `replacement` when the matched word started upper-case.
fn match_case(matched: &str, replacement: &str) -> String {
    if matched.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

pub fn validate_resume_content(summary: &str, skills: &str, experience: &str) -> ContentValidation {
    let summary = scan_for_bias(summary);
    let skills = scan_for_bias(skills);
    let experience = scan_for_bias(experience);
    let total_issues = summary.total_issues + skills.total_issues + experience.total_issues;
    ContentValidation {
        overall_safe: total_issues == 0,
        summary,
        skills,
        experience,
        total_issues,
    }
}
