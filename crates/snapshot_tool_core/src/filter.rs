use regex::Regex;

use crate::error::ConfigError;
use crate::naming::has_name_marker;
use crate::snapshot::{ClusterSnapshot, FilteredSnapshots};

pub const ALL_CLUSTERS: &str = "ALL_CLUSTERS";
pub const ALL_SNAPSHOTS: &str = "ALL_SNAPSHOTS";

/// Name pattern restricting which snapshots a job considers.
#[derive(Debug, Clone)]
pub enum SnapshotPattern {
    All,
    Regex(Regex),
}

impl SnapshotPattern {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed == ALL_CLUSTERS || trimmed == ALL_SNAPSHOTS {
            return Ok(Self::All);
        }
        Regex::new(trimmed)
            .map(Self::Regex)
            .map_err(|error| ConfigError::InvalidPattern {
                pattern: trimmed.to_string(),
                reason: error.to_string(),
            })
    }

    /// Unanchored search: the pattern may match anywhere in `value`.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Regex(regex) => regex.is_match(value),
        }
    }
}

impl PartialEq for SnapshotPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::All, Self::All) => true,
            (Self::Regex(left), Self::Regex(right)) => left.as_str() == right.as_str(),
            _ => false,
        }
    }
}

fn is_candidate(snapshot: &ClusterSnapshot) -> bool {
    snapshot.is_owned_manual() && snapshot.has_supported_engine()
}

/// Owned snapshots whose snapshot identifier matches `pattern`, regardless of
/// their tag state. Tags are inspected by the caller.
pub fn filter_own_snapshots_share(
    pattern: &SnapshotPattern,
    snapshots: impl IntoIterator<Item = ClusterSnapshot>,
) -> FilteredSnapshots {
    snapshots
        .into_iter()
        .filter(|snapshot| is_candidate(snapshot) && pattern.matches(&snapshot.identifier))
        .map(|snapshot| (snapshot.identifier.clone(), snapshot))
        .collect()
}

/// Owned snapshots whose cluster identifier matches `pattern` and which were
/// produced by this tool.
///
/// A snapshot whose identifier starts with `<marker>-` qualifies directly;
/// otherwise `created_by_tool` decides, which lets the caller fall back to a
/// tag lookup only for the snapshots that need one.
pub fn filter_own_snapshots_source(
    pattern: &SnapshotPattern,
    marker: Option<&str>,
    snapshots: impl IntoIterator<Item = ClusterSnapshot>,
    mut created_by_tool: impl FnMut(&ClusterSnapshot) -> bool,
) -> FilteredSnapshots {
    let mut filtered = FilteredSnapshots::new();
    for snapshot in snapshots {
        if !is_candidate(&snapshot) || !pattern.matches(&snapshot.cluster_identifier) {
            continue;
        }
        let named_by_tool =
            marker.is_some_and(|marker| has_name_marker(&snapshot.identifier, marker));
        if named_by_tool || created_by_tool(&snapshot) {
            filtered.insert(snapshot.identifier.clone(), snapshot);
        }
    }
    filtered
}
