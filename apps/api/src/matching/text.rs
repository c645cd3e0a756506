//! Text normalization and tokenization for term extraction.
//!
//! Normalization: lowercase, anything outside `[a-z0-9]` becomes a separator,
//! whitespace collapses, tokens shorter than `MIN_TOKEN_LEN` and stop words are
//! dropped. A crude plural collapse strips one trailing `s`; it is a heuristic
//! ("kubernetes" becomes "kubernete", "analysis" is left alone) and is applied
//! identically to both documents, so it only affects which tokens merge.
//!
//! Known limitation: only ASCII letters and digits survive normalization, so
//! accented or non-Latin words split apart ("Großprojekte" becomes "gro projekte").

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Tokens shorter than this are discarded.
pub const MIN_TOKEN_LEN: usize = 2;

/// English function words plus resume boilerplate that carries no signal.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "must", "my", "myself", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves", "etc", "using", "including", "also", "well", "able", "working", "work",
    "experience", "year", "years", "job", "looking", "need", "needed", "strong", "plus",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Returns true if `token` is in the built-in stop-word list.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

/// Lowercases, replaces punctuation with spaces and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapses a simple trailing-`s` plural. Heuristic only.
pub fn singularize(token: &str) -> &str {
    if token.len() > 3
        && token.ends_with('s')
        && !token.ends_with("ss")
        && !token.ends_with("us")
        && !token.ends_with("sis")
        && !token.ends_with("xis")
    {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Splits raw text into `(surface, term)` pairs in reading order. `surface` is the
/// normalized word as written, `term` its plural-collapsed form used for weighting.
pub fn tokenize_with_surface(text: &str) -> Vec<(String, String)> {
    normalize(text)
        .split(' ')
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .filter(|t| !is_stop_word(t))
        .map(|t| (t.to_string(), singularize(t).to_string()))
        .filter(|(_, term)| !is_stop_word(term))
        .collect()
}

/// Splits raw text into normalized, filtered terms in reading order.
#[cfg(test)]
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with_surface(text)
        .into_iter()
        .map(|(_, term)| term)
        .collect()
}

/// A tokenized input text (resume or job description). Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Document {
    tokens: Vec<String>,
    term_counts: HashMap<String, usize>,
    surface_forms: HashMap<String, String>,
}

impl Document {
    pub fn new(raw: &str) -> Self {
        let pairs = tokenize_with_surface(raw);
        let mut term_counts = HashMap::new();
        let mut surface_forms = HashMap::new();
        for (surface, term) in &pairs {
            *term_counts.entry(term.clone()).or_insert(0) += 1;
            surface_forms
                .entry(term.clone())
                .or_insert_with(|| surface.clone());
        }
        Self {
            tokens: pairs.into_iter().map(|(_, term)| term).collect(),
            term_counts,
            surface_forms,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn count(&self, term: &str) -> usize {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.term_counts.contains_key(term)
    }

    /// Distinct terms in order of first occurrence.
    pub fn distinct_terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tokens
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// The word as first written in this document for a collapsed `term`.
    pub fn surface_form<'a>(&'a self, term: &'a str) -> &'a str {
        self.surface_forms.get(term).map(String::as_str).unwrap_or(term)
    }
}
