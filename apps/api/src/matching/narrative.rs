//! Score-band narratives. A fixed, ordered policy table; first band whose
//! threshold the score meets wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Excellent,
    Good,
    Moderate,
    Low,
}

struct Band {
    min_score: f64,
    tier: MatchTier,
    message: &'static str,
}

const BANDS: &[Band] = &[
    Band {
        min_score: 80.0,
        tier: MatchTier::Excellent,
        message: "Your resume aligns strongly with the job requirements. \
            Fine-tune specific metrics and achievements.",
    },
    Band {
        min_score: 60.0,
        tier: MatchTier::Good,
        message: "Your resume covers many requirements. \
            Consider adding missing keywords and quantifiable results.",
    },
    Band {
        min_score: 40.0,
        tier: MatchTier::Moderate,
        message: "There are notable gaps. Focus on incorporating more job-specific \
            terminology and relevant experience.",
    },
    Band {
        min_score: f64::NEG_INFINITY,
        tier: MatchTier::Low,
        message: "Significant gaps exist between your resume and the job description. \
            Consider tailoring your resume specifically for this role.",
    },
];

fn band_for(score: f64) -> &'static Band {
    BANDS
        .iter()
        .find(|band| score >= band.min_score)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

#[cfg(test)]
pub fn tier_for(score: f64) -> MatchTier {
    band_for(score).tier
}

fn tier_label(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Excellent => "Excellent match",
        MatchTier::Good => "Good match",
        MatchTier::Moderate => "Moderate match",
        MatchTier::Low => "Low match",
    }
}

/// Builds the narrative for a scored match. Sub-scores are mentioned only when
/// a semantic score took part in the blend.
pub fn narrative_for(overall: f64, lexical: f64, semantic: Option<f64>) -> String {
    let band = band_for(overall);
    let label = tier_label(band.tier);
    match semantic {
        Some(semantic) => format!(
            "{label} ({overall:.1}%). Semantic similarity: {semantic:.1}%, keyword overlap: {lexical:.1}%. {}",
            band.message
        ),
        None => format!("{label} ({overall:.1}%). {}", band.message),
    }
}

/// Narrative for input that had nothing to compare.
pub const INSUFFICIENT_TEXT: &str = "Insufficient text provided for analysis.";
