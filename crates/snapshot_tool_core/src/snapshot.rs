use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const MANUAL_SNAPSHOT_TYPE: &str = "manual";
pub const SUPPORTED_ENGINES: [&str; 3] = ["aurora", "aurora-mysql", "aurora-postgresql"];

/// Snapshots that passed a filter, keyed by snapshot identifier.
pub type FilteredSnapshots = BTreeMap<String, ClusterSnapshot>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Creating,
    Available,
    Copying,
    Deleting,
    Failed,
    Other(String),
}

impl SnapshotStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "copying" => Self::Copying,
            "deleting" => Self::Deleting,
            "failed" | "error" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => f.write_str("creating"),
            Self::Available => f.write_str("available"),
            Self::Copying => f.write_str("copying"),
            Self::Deleting => f.write_str("deleting"),
            Self::Failed => f.write_str("failed"),
            Self::Other(value) => f.write_str(value),
        }
    }
}

/// Cluster snapshot metadata as returned by the describe call.
///
/// The creation time is deliberately absent: retention is derived from the
/// timestamp embedded in `identifier`, see [`crate::naming`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub identifier: String,
    pub arn: String,
    pub cluster_identifier: String,
    pub status: SnapshotStatus,
    pub snapshot_type: String,
    pub engine: String,
    pub storage_encrypted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
}

impl ClusterSnapshot {
    /// Manual snapshots are the only ones the account owns outright; shared
    /// and automated snapshots are excluded from both jobs.
    pub fn is_owned_manual(&self) -> bool {
        self.snapshot_type.eq_ignore_ascii_case(MANUAL_SNAPSHOT_TYPE)
    }

    pub fn has_supported_engine(&self) -> bool {
        SUPPORTED_ENGINES.contains(&self.engine.as_str())
    }

    /// KMS key to classify, present only for encrypted snapshots.
    pub fn encryption_key(&self) -> Option<&str> {
        if self.storage_encrypted {
            self.kms_key_id.as_deref().filter(|key| !key.is_empty())
        } else {
            None
        }
    }
}
