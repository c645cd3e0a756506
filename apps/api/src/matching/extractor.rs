//! Term Extractor: TF-IDF term vectors over the two-document corpus {resume, JD}.
//!
//! tf(t, d) = count(t, d) / len(d)
//! idf(t)   = ln((N + 1) / (df(t) + 1)) + 1, with N = 2
//!
//! The corpus is rebuilt per call; nothing is shared across requests.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::matching::text::Document;

/// Number of documents in the per-request corpus.
const CORPUS_SIZE: f64 = 2.0;

/// Sparse term → weight map. Weights are strictly positive; absent terms weigh zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermVector {
    weights: HashMap<String, f64>,
}

impl TermVector {
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Cosine similarity in [0, 1]. Zero vectors have similarity 0.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let dot: f64 = small
            .weights
            .iter()
            .map(|(term, w)| w * large.weight(term))
            .sum();
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        (dot / denom).clamp(0.0, 1.0)
    }

    fn insert(&mut self, term: &str, weight: f64) {
        if weight > 0.0 {
            self.weights.insert(term.to_string(), weight);
        }
    }
}

/// A JD term ranked by its weight in the job description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTerm {
    /// Normalized (plural-collapsed) term used for comparison.
    pub term: String,
    /// The term as first written in the job description.
    pub display: String,
    pub weight: f64,
}

/// Output of the extractor for one (resume, JD) pair.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub resume_vector: TermVector,
    pub job_vector: TermVector,
    /// The JD's top-N terms, weight descending, ties by first occurrence in the JD.
    pub job_top_terms: Vec<RankedTerm>,
}

impl Extraction {
    #[cfg(test)]
    pub fn is_degenerate(&self) -> bool {
        self.resume_vector.is_empty() || self.job_vector.is_empty()
    }
}

/// Smoothed inverse document frequency over the fixed two-document corpus.
pub fn idf(document_frequency: usize) -> f64 {
    ((CORPUS_SIZE + 1.0) / (document_frequency as f64 + 1.0)).ln() + 1.0
}

fn weigh(doc: &Document, other: &Document) -> TermVector {
    let mut vector = TermVector::default();
    if doc.is_empty() {
        return vector;
    }
    let len = doc.len() as f64;
    for term in doc.distinct_terms() {
        let df = 1 + usize::from(other.contains(term));
        let tf = doc.count(term) as f64 / len;
        vector.insert(term, tf * idf(df));
    }
    vector
}

/// Builds both term vectors and the JD's ranked significant terms.
///
/// Empty or stop-word-only input yields empty vectors rather than an error.
pub fn extract_terms(resume: &Document, job: &Document, top_n: usize) -> Extraction {
    let resume_vector = weigh(resume, job);
    let job_vector = weigh(job, resume);

    let mut ranked: Vec<(usize, RankedTerm)> = job
        .distinct_terms()
        .into_iter()
        .enumerate()
        .map(|(first_seen, term)| {
            (
                first_seen,
                RankedTerm {
                    term: term.to_string(),
                    display: job.surface_form(term).to_string(),
                    weight: job_vector.weight(term),
                },
            )
        })
        .filter(|(_, ranked)| ranked.weight > 0.0)
        .collect();

    // distinct_terms() is already in first-occurrence order, so the index breaks ties.
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
            .then(ia.cmp(ib))
    });
    ranked.truncate(top_n);

    Extraction {
        resume_vector,
        job_vector,
        job_top_terms: ranked.into_iter().map(|(_, r)| r).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(resume: &str, job: &str, top_n: usize) -> Extraction {
        extract_terms(&Document::new(resume), &Document::new(job), top_n)
    }

    #[test]
    fn test_idf_is_smoothed() {
        // term in both docs: ln(3/3) + 1 = 1
        assert!((idf(2) - 1.0).abs() < 1e-12);
        // term in one doc: ln(3/2) + 1
        assert!((idf(1) - (1.5_f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unique_terms_weigh_more_than_shared_terms() {
        let ex = extract("python docker", "python kubernetes", 10);
        assert!(ex.job_vector.weight("kubernete") > ex.job_vector.weight("python"));
        assert_eq!(ex.resume_vector.weight("kubernete"), 0.0);
        assert!(!ex.resume_vector.contains("kubernete"));
    }

    #[test]
    fn test_weights_follow_tf_idf_formula() {
        let ex = extract("rust rust go", "rust", 10);
        let expected = (2.0 / 3.0) * idf(2);
        assert!((ex.resume_vector.weight("rust") - expected).abs() < 1e-12);
        let go = (1.0 / 3.0) * idf(1);
        assert!((ex.resume_vector.weight("go") - go).abs() < 1e-12);
    }

    #[test]
    fn test_top_terms_rank_by_weight_then_first_occurrence() {
        let ex = extract("", "docker python python clusters", 10);
        let terms: Vec<&str> = ex.job_top_terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["python", "docker", "cluster"]);
        assert_eq!(ex.job_top_terms[2].display, "clusters");
    }

    #[test]
    fn test_top_terms_truncated_to_n() {
        let ex = extract("", "alpha beta gamma delta epsilon", 3);
        let terms: Vec<&str> = ex.job_top_terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_cosine_of_identical_vectors_is_one() {
        let ex = extract("python fastapi docker", "python fastapi docker", 10);
        assert!((ex.resume_vector.cosine(&ex.job_vector) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_of_zero_vectors_is_zero() {
        let ex = extract("", "", 10);
        assert!(ex.is_degenerate());
        assert_eq!(ex.resume_vector.cosine(&ex.job_vector), 0.0);
    }

    #[test]
    fn test_disjoint_documents_have_zero_cosine() {
        let ex = extract("photoshop illustrator", "python docker", 10);
        assert_eq!(ex.resume_vector.cosine(&ex.job_vector), 0.0);
    }
}
