// Resume generation engine.
// Implements: AI section writing, cover letters, ATS keywords, recommendations, the full pipeline.
// All LLM calls go through llm_client; no direct Gemini HTTP calls here.

pub mod content;
pub mod generator;
pub mod handlers;
pub mod prompts;
