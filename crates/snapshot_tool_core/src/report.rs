use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotToolError;

pub const SHARE_JOB: &str = "share_snapshots";
pub const PURGE_JOB: &str = "delete_old_snapshots";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListTags,
    Copy,
    TagSource,
    Share,
    TagShared,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ListTags => "list_tags",
            Self::Copy => "copy",
            Self::TagSource => "tag_source",
            Self::Share => "share",
            Self::TagShared => "tag_shared",
            Self::Delete => "delete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Copied { target: String },
    Shared { target: String },
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAction {
    pub snapshot: String,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub snapshot: String,
    pub operation: Operation,
    pub message: String,
}

/// Outcome of one job run. Failures are collected per item and surfaced as a
/// single error by [`BatchReport::into_result`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub job: String,
    pub considered: usize,
    pub actions: Vec<ItemAction>,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    pub fn new(job: &str) -> Self {
        Self {
            job: job.to_string(),
            considered: 0,
            actions: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_action(&mut self, snapshot: &str, action: Action) {
        self.actions.push(ItemAction {
            snapshot: snapshot.to_string(),
            action,
        });
    }

    pub fn record_failure(
        &mut self,
        snapshot: &str,
        operation: Operation,
        message: impl Into<String>,
    ) {
        self.failures.push(ItemFailure {
            snapshot: snapshot.to_string(),
            operation,
            message: message.into(),
        });
    }

    pub fn pending(&self) -> usize {
        self.failures.len()
    }

    pub fn count_actions(&self, matches: impl Fn(&Action) -> bool) -> usize {
        self.actions
            .iter()
            .filter(|item| matches(&item.action))
            .count()
    }

    pub fn into_result(self, job: &'static str) -> Result<Self, SnapshotToolError> {
        match self.pending() {
            0 => Ok(self),
            pending => Err(SnapshotToolError::PendingItems { job, pending }),
        }
    }
}
