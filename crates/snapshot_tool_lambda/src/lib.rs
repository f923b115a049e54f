//! AWS-oriented adapters and handlers for the Aurora snapshot tool.
//!
//! This crate owns runtime integration details (Lambda binaries, RDS and KMS
//! adapters, logging setup) and the two batch workflows built on top of them.
//! Domain primitives are exposed through the single `runtime` module boundary.

pub mod adapters;
pub mod handlers;
pub mod logging;
pub mod runtime;
