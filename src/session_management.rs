//! Session management core module.
//!
//! A session is created from an uploaded lecture document: the document text
//! is extracted best-effort, the generation service proposes KAUs, and the
//! session plus its suggested KAUs are persisted together.

/// Submodule for best-effort document text extraction.
pub mod extract;
/// Submodule for the session creation flow.
pub mod session_manager;
