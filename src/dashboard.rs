//! Dashboard aggregation module.
//!
//! Aggregates a session's feedback into a ranked list of recurring
//! missing-point gaps with templated remediation suggestions.

pub mod aggregator;
