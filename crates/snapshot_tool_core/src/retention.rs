use chrono::NaiveDateTime;

use crate::naming::parse_snapshot_timestamp;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RetentionDecision {
    Delete { age_days: f64 },
    Keep { age_days: f64 },
    /// No parseable timestamp in the identifier; never deleted.
    NoTimestamp,
}

pub fn age_in_days(created: NaiveDateTime, now: NaiveDateTime) -> f64 {
    (now - created).num_seconds() as f64 / SECONDS_PER_DAY
}

/// A snapshot is deleted only when strictly older than `retention_days`.
pub fn retention_decision(
    identifier: &str,
    retention_days: u32,
    now: NaiveDateTime,
) -> RetentionDecision {
    let Some(created) = parse_snapshot_timestamp(identifier) else {
        return RetentionDecision::NoTimestamp;
    };
    let age_days = age_in_days(created, now);
    if age_days > f64::from(retention_days) {
        RetentionDecision::Delete { age_days }
    } else {
        RetentionDecision::Keep { age_days }
    }
}
