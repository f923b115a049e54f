use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::adapters::snapshot_api::{paginate_cluster_snapshots, SnapshotApi};
use crate::runtime::config::PurgeConfig;
use crate::runtime::error::SnapshotToolError;
use crate::runtime::filter::filter_own_snapshots_source;
use crate::runtime::report::{Action, BatchReport, Operation, PURGE_JOB};
use crate::runtime::retention::{retention_decision, RetentionDecision};
use crate::runtime::snapshot::MANUAL_SNAPSHOT_TYPE;
use crate::runtime::tags::search_tag_created;

/// Deletes tool-created snapshots whose embedded timestamp is older than
/// `retention_days`.
pub fn handle_purge(
    config: &PurgeConfig,
    api: &impl SnapshotApi,
    now: NaiveDateTime,
) -> Result<BatchReport, SnapshotToolError> {
    let snapshots =
        paginate_cluster_snapshots(api, MANUAL_SNAPSHOT_TYPE).map_err(SnapshotToolError::Listing)?;
    let filtered = filter_own_snapshots_source(
        &config.pattern,
        config.name_prefix.as_deref(),
        snapshots,
        |snapshot| match api.list_tags(&snapshot.arn) {
            Ok(tags) => search_tag_created(&tags),
            Err(error) => {
                warn!(snapshot = %snapshot.identifier, %error, "could not read tags; keeping snapshot");
                false
            }
        },
    );

    let mut report = BatchReport::new(PURGE_JOB);
    report.considered = filtered.len();
    info!(
        job = PURGE_JOB,
        candidates = filtered.len(),
        retention_days = config.retention_days,
        "evaluating snapshots for retention"
    );

    for identifier in filtered.keys() {
        match retention_decision(identifier, config.retention_days, now) {
            RetentionDecision::NoTimestamp => {
                debug!(snapshot = %identifier, "no timestamp in name; not deleting");
            }
            RetentionDecision::Keep { age_days } => {
                debug!(snapshot = %identifier, age_days, "within retention; not deleting");
            }
            RetentionDecision::Delete { age_days } => {
                info!(snapshot = %identifier, age_days, "deleting snapshot");
                match api.delete_snapshot(identifier) {
                    Ok(()) => report.record_action(identifier, Action::Deleted),
                    Err(error) => {
                        warn!(snapshot = %identifier, %error, "could not delete");
                        report.record_failure(identifier, Operation::Delete, error);
                    }
                }
            }
        }
    }

    Ok(report)
}
