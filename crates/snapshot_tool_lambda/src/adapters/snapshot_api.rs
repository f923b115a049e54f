use crate::runtime::snapshot::ClusterSnapshot;
use crate::runtime::tags::Tag;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotPage {
    pub snapshots: Vec<ClusterSnapshot>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub source_arn: String,
    pub target_identifier: String,
    pub kms_key_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedSnapshot {
    pub identifier: String,
    pub arn: String,
}

/// Cluster snapshot operations the workflows need from RDS.
pub trait SnapshotApi {
    fn describe_cluster_snapshots(
        &self,
        snapshot_type: &str,
        marker: Option<&str>,
    ) -> Result<SnapshotPage, String>;

    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, String>;

    fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), String>;

    /// Starts a copy re-encrypted with `kms_key_id`; source tags are carried over.
    fn copy_snapshot(&self, request: &CopyRequest) -> Result<CopiedSnapshot, String>;

    /// Adds `account_id` to the snapshot's `restore` attribute.
    fn share_snapshot(&self, snapshot: &str, account_id: &str) -> Result<(), String>;

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String>;
}

/// Follows describe markers until the last page and returns every snapshot.
pub fn paginate_cluster_snapshots(
    api: &impl SnapshotApi,
    snapshot_type: &str,
) -> Result<Vec<ClusterSnapshot>, String> {
    let mut snapshots = Vec::new();
    let mut marker: Option<String> = None;

    loop {
        let page = api.describe_cluster_snapshots(snapshot_type, marker.as_deref())?;
        snapshots.extend(page.snapshots);

        match page.marker.filter(|next| !next.is_empty()) {
            Some(next) if marker.as_deref() == Some(next.as_str()) => {
                return Err(format!("pagination marker '{next}' did not advance"));
            }
            Some(next) => marker = Some(next),
            None => return Ok(snapshots),
        }
    }
}
