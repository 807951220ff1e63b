//! Wire types for pixgate.
//!
//! `openai` holds the downstream (OpenAI-compatible) request/response shapes,
//! `upstream` holds the bespoke schema of the image-generation backend.

pub mod openai;
pub mod upstream;
