//! Submission processing module.
//!
//! A student upload is validated against its session, stored as raw bytes,
//! graded by the generation service against the session's finalized KAUs,
//! and recorded together with the resulting feedback.

pub mod submission_processor;
