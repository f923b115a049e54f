use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::{DbClusterSnapshot, Tag as RdsTag};

use crate::adapters::key_directory::KeyDirectory;
use crate::adapters::snapshot_api::{CopiedSnapshot, CopyRequest, SnapshotApi, SnapshotPage};
use crate::runtime::kms::KeyKind;
use crate::runtime::snapshot::{ClusterSnapshot, SnapshotStatus};
use crate::runtime::tags::Tag;

const RESTORE_ATTRIBUTE: &str = "restore";

/// Loads SDK configuration, pinning the region when one was configured.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match region {
        Some(region) => loader.region(Region::new(region)).load().await,
        None => loader.load().await,
    }
}

// The workflows are synchronous; each SDK call is driven to completion on the
// Lambda runtime's multi-threaded executor.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub struct AwsRdsSnapshotApi {
    client: aws_sdk_rds::Client,
}

impl AwsRdsSnapshotApi {
    pub fn new(client: aws_sdk_rds::Client) -> Self {
        Self { client }
    }
}

fn cluster_snapshot_from_sdk(snapshot: &DbClusterSnapshot) -> Option<ClusterSnapshot> {
    Some(ClusterSnapshot {
        identifier: snapshot.db_cluster_snapshot_identifier()?.to_string(),
        arn: snapshot.db_cluster_snapshot_arn()?.to_string(),
        cluster_identifier: snapshot
            .db_cluster_identifier()
            .unwrap_or_default()
            .to_string(),
        status: SnapshotStatus::parse(snapshot.status().unwrap_or_default()),
        snapshot_type: snapshot.snapshot_type().unwrap_or_default().to_string(),
        engine: snapshot.engine().unwrap_or_default().to_string(),
        storage_encrypted: snapshot.storage_encrypted().unwrap_or(false),
        kms_key_id: snapshot.kms_key_id().map(str::to_string),
    })
}

fn rds_tag(tag: &Tag) -> RdsTag {
    RdsTag::builder()
        .key(tag.key.clone())
        .value(tag.value.clone())
        .build()
}

impl SnapshotApi for AwsRdsSnapshotApi {
    fn describe_cluster_snapshots(
        &self,
        snapshot_type: &str,
        marker: Option<&str>,
    ) -> Result<SnapshotPage, String> {
        let output = block_on(
            self.client
                .describe_db_cluster_snapshots()
                .snapshot_type(snapshot_type)
                .set_marker(marker.map(str::to_string))
                .send(),
        )
        .map_err(|error| {
            format!(
                "failed to describe cluster snapshots: {}",
                DisplayErrorContext(&error)
            )
        })?;

        Ok(SnapshotPage {
            snapshots: output
                .db_cluster_snapshots()
                .iter()
                .filter_map(cluster_snapshot_from_sdk)
                .collect(),
            marker: output.marker().map(str::to_string),
        })
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, String> {
        let output = block_on(self.client.list_tags_for_resource().resource_name(arn).send())
            .map_err(|error| {
                format!("failed to list tags for {arn}: {}", DisplayErrorContext(&error))
            })?;

        Ok(output
            .tag_list()
            .iter()
            .filter_map(|tag| Some(Tag::new(tag.key()?, tag.value().unwrap_or_default())))
            .collect())
    }

    fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), String> {
        block_on(
            self.client
                .add_tags_to_resource()
                .resource_name(arn)
                .set_tags(Some(tags.iter().map(rds_tag).collect()))
                .send(),
        )
        .map(|_| ())
        .map_err(|error| format!("failed to tag {arn}: {}", DisplayErrorContext(&error)))
    }

    fn copy_snapshot(&self, request: &CopyRequest) -> Result<CopiedSnapshot, String> {
        let output = block_on(
            self.client
                .copy_db_cluster_snapshot()
                .source_db_cluster_snapshot_identifier(&request.source_arn)
                .target_db_cluster_snapshot_identifier(&request.target_identifier)
                .kms_key_id(&request.kms_key_id)
                .copy_tags(true)
                .send(),
        )
        .map_err(|error| {
            format!(
                "failed to copy {} to {}: {}",
                request.source_arn,
                request.target_identifier,
                DisplayErrorContext(&error)
            )
        })?;

        let arn = output
            .db_cluster_snapshot()
            .and_then(DbClusterSnapshot::db_cluster_snapshot_arn)
            .ok_or_else(|| {
                format!(
                    "copy of {} returned no snapshot arn",
                    request.target_identifier
                )
            })?;

        Ok(CopiedSnapshot {
            identifier: request.target_identifier.clone(),
            arn: arn.to_string(),
        })
    }

    fn share_snapshot(&self, snapshot: &str, account_id: &str) -> Result<(), String> {
        block_on(
            self.client
                .modify_db_cluster_snapshot_attribute()
                .db_cluster_snapshot_identifier(snapshot)
                .attribute_name(RESTORE_ATTRIBUTE)
                .values_to_add(account_id)
                .send(),
        )
        .map(|_| ())
        .map_err(|error| {
            format!(
                "failed to share {snapshot} with {account_id}: {}",
                DisplayErrorContext(&error)
            )
        })
    }

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String> {
        block_on(
            self.client
                .delete_db_cluster_snapshot()
                .db_cluster_snapshot_identifier(identifier)
                .send(),
        )
        .map(|_| ())
        .map_err(|error| {
            format!(
                "failed to delete {identifier}: {}",
                DisplayErrorContext(&error)
            )
        })
    }
}

pub struct AwsKmsKeyDirectory {
    client: aws_sdk_kms::Client,
}

impl AwsKmsKeyDirectory {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }
}

impl KeyDirectory for AwsKmsKeyDirectory {
    fn classify_key(&self, key_id: &str) -> Result<KeyKind, String> {
        let output = block_on(self.client.describe_key().key_id(key_id).send()).map_err(|error| {
            format!(
                "failed to describe key {key_id}: {}",
                aws_sdk_kms::error::DisplayErrorContext(&error)
            )
        })?;

        let manager = output
            .key_metadata()
            .and_then(|metadata| metadata.key_manager())
            .ok_or_else(|| format!("key {key_id} has no key manager"))?;
        Ok(KeyKind::from_key_manager(manager.as_str()))
    }
}
