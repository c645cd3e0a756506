// Resume ↔ job-description matching.
// Extractor (TF-IDF term vectors) → Scorer (lexical + optional semantic blend).
// Everything here is pure except `service`, which awaits the semantic backend,
// and `handlers`, the HTTP surface.

pub mod extractor;
pub mod handlers;
pub mod narrative;
pub mod scorer;
pub mod semantic;
pub mod service;
pub mod text;

pub use scorer::{MatchConfig, MatchOptions, MatchResult, Scorer};
pub use semantic::{EmbeddingBackend, NullBackend, SemanticBackend};
pub use service::{MatchService, ScoredMatch};
