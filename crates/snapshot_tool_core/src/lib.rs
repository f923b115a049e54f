//! Shared Aurora snapshot tool domain primitives.
//!
//! This crate owns the deterministic decision logic for the share-and-copy and
//! retention-purge jobs: configuration, snapshot filtering, tag inspection,
//! timestamp parsing, copy naming and batch failure aggregation. It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod error;
pub mod filter;
pub mod kms;
pub mod naming;
pub mod report;
pub mod retention;
pub mod snapshot;
pub mod tags;
