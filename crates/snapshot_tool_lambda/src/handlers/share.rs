use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::adapters::key_directory::{snapshot_encryption, KeyDirectory};
use crate::adapters::snapshot_api::{paginate_cluster_snapshots, CopyRequest, SnapshotApi};
use crate::runtime::config::ShareConfig;
use crate::runtime::error::SnapshotToolError;
use crate::runtime::filter::filter_own_snapshots_share;
use crate::runtime::kms::{share_route, Encryption, ShareRoute};
use crate::runtime::naming::copy_snapshot_name;
use crate::runtime::report::{Action, BatchReport, Operation, SHARE_JOB};
use crate::runtime::snapshot::{ClusterSnapshot, MANUAL_SNAPSHOT_TYPE};
use crate::runtime::tags::{search_tag_share, Tag};

/// Snapshot handed to the destination account and then re-tagged.
struct ShareTarget {
    /// Identifier passed to the restore-attribute call.
    snapshot: String,
    arn: String,
}

/// Shares every available snapshot tagged `shareAndCopy=YES` with the
/// destination account, copying default-key snapshots under `backup_kms` first.
///
/// Per-snapshot failures are recorded in the returned report; only a failure to
/// list the inventory aborts the run.
pub fn handle_share(
    config: &ShareConfig,
    api: &impl SnapshotApi,
    keys: &impl KeyDirectory,
    now: NaiveDateTime,
) -> Result<BatchReport, SnapshotToolError> {
    let snapshots =
        paginate_cluster_snapshots(api, MANUAL_SNAPSHOT_TYPE).map_err(SnapshotToolError::Listing)?;
    let filtered = filter_own_snapshots_share(&config.pattern, snapshots);

    let mut report = BatchReport::new(SHARE_JOB);
    report.considered = filtered.len();
    info!(
        job = SHARE_JOB,
        candidates = filtered.len(),
        "evaluating snapshots for sharing"
    );

    for (identifier, snapshot) in &filtered {
        let tags = match api.list_tags(&snapshot.arn) {
            Ok(tags) => tags,
            Err(error) => {
                warn!(snapshot = %identifier, %error, "could not read tags");
                report.record_failure(identifier, Operation::ListTags, error);
                continue;
            }
        };

        if !snapshot.status.is_available() || !search_tag_share(&tags) {
            debug!(
                snapshot = %identifier,
                status = %snapshot.status,
                "not marked for sharing"
            );
            continue;
        }

        share_one(config, api, keys, now, snapshot, &mut report);
    }

    Ok(report)
}

fn share_one(
    config: &ShareConfig,
    api: &impl SnapshotApi,
    keys: &impl KeyDirectory,
    now: NaiveDateTime,
    snapshot: &ClusterSnapshot,
    report: &mut BatchReport,
) {
    let identifier = snapshot.identifier.as_str();
    let encryption = snapshot_encryption(keys, snapshot);
    match &encryption {
        Encryption::Unencrypted => debug!(snapshot = %identifier, "snapshot is not encrypted"),
        Encryption::Classified(kind) => debug!(snapshot = %identifier, ?kind, "classified key"),
        Encryption::Unresolved(error) => warn!(
            snapshot = %identifier,
            %error,
            "could not classify key; sharing without re-encryption"
        ),
    }

    let target = match share_route(&encryption, config.backup_kms.as_deref()) {
        ShareRoute::Direct => ShareTarget {
            snapshot: snapshot.arn.clone(),
            arn: snapshot.arn.clone(),
        },
        ShareRoute::CopyWithKey { kms_key_id } => {
            let request = CopyRequest {
                source_arn: snapshot.arn.clone(),
                target_identifier: copy_snapshot_name(
                    config.name_prefix.as_deref(),
                    &snapshot.cluster_identifier,
                    now,
                ),
                kms_key_id,
            };
            info!(
                snapshot = %identifier,
                target = %request.target_identifier,
                "copying snapshot with backup key"
            );
            let copied = match api.copy_snapshot(&request) {
                Ok(copied) => copied,
                Err(error) => {
                    // The original stays under the default key, so it is not shared.
                    warn!(snapshot = %identifier, %error, "copy failed");
                    report.record_failure(identifier, Operation::Copy, error);
                    return;
                }
            };
            report.record_action(
                identifier,
                Action::Copied {
                    target: copied.identifier.clone(),
                },
            );

            if let Err(error) = api.add_tags(&snapshot.arn, &[Tag::share_done()]) {
                warn!(snapshot = %identifier, %error, "could not mark copied source");
                report.record_failure(identifier, Operation::TagSource, error);
            }

            ShareTarget {
                snapshot: copied.identifier,
                arn: copied.arn,
            }
        }
    };

    if let Err(error) = api.share_snapshot(&target.snapshot, &config.dest_account_id) {
        warn!(snapshot = %target.snapshot, %error, "share failed");
        report.record_failure(&target.snapshot, Operation::Share, error);
        return;
    }
    info!(
        snapshot = %target.snapshot,
        account = %config.dest_account_id,
        "shared snapshot"
    );

    match api.add_tags(&target.arn, &[Tag::share_done()]) {
        Ok(()) => report.record_action(
            identifier,
            Action::Shared {
                target: target.snapshot,
            },
        ),
        Err(error) => {
            warn!(snapshot = %target.snapshot, %error, "shared but could not flip share tag");
            report.record_failure(&target.snapshot, Operation::TagShared, error);
        }
    }
}
