//! Generation service integration.
//!
//! The external text-completion provider is modelled as a function from a
//! prompt (embedding a JSON schema) to raw model text. Callers parse the text
//! strictly as JSON against the schema they asked for.
//!
//! Components:
//! - `client`: the `GenerationService` trait and the Gemini REST client.
//! - `prompts`: fixed instructional prompts and their JSON schemas.

pub mod client;
pub mod prompts;
