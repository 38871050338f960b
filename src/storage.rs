//! Storage subsystem
//!
//! This module provides abstractions and implementations for persisting
//! sessions, KAUs, submissions and feedback, plus the binary object store
//! for uploaded files.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining a uniform API.
//! - `types`: shared data types used across the crate.
//! - `remarks`: the semicolon-delimited remark-list encoding.
//! - `database_storage`: SQLite implementation using sqlx.
//! - `file_store`: filesystem-backed object store for raw upload bytes.

pub mod database_storage;
pub mod file_store;
pub mod remarks;
pub mod storage_trait;
pub mod types;
