use serde_json::{json, Value};
use tracing::error;

use crate::runtime::report::{Action, BatchReport};

pub mod purge;
pub mod share;

/// JSON body returned to the Lambda runtime when a run finished cleanly.
pub fn success_response(report: &BatchReport) -> Value {
    json!({
        "status": "ok",
        "job": report.job.clone(),
        "considered": report.considered,
        "copied": report.count_actions(|action| matches!(action, Action::Copied { .. })),
        "shared": report.count_actions(|action| matches!(action, Action::Shared { .. })),
        "deleted": report.count_actions(|action| matches!(action, Action::Deleted)),
        "actions": report.actions.clone(),
    })
}

pub fn log_failures(report: &BatchReport) {
    for failure in &report.failures {
        error!(
            job = %report.job,
            snapshot = %failure.snapshot,
            operation = %failure.operation,
            message = %failure.message,
            "snapshot left pending"
        );
    }
}
