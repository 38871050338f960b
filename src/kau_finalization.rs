//! KAU finalization module.
//!
//! Finalizing marks the subset of a session's KAUs that later submissions
//! are graded against.

pub mod kau_finalizer;
