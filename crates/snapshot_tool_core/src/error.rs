use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be configured")]
    Missing { key: &'static str },
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("invalid snapshot pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotToolError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to list cluster snapshots: {0}")]
    Listing(String),
    /// Raised once per run when any snapshot could not be processed.
    #[error("{job}: snapshots pending: {pending}")]
    PendingItems { job: &'static str, pending: usize },
}
