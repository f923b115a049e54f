//! Job configuration, built once per invocation from an environment lookup.
//!
//! Both jobs take a lookup closure instead of reading process state so tests
//! (and the Lambda binaries) decide where values come from.

use crate::error::ConfigError;
use crate::filter::{SnapshotPattern, ALL_CLUSTERS};
use crate::naming::{normalize_prefix, DEFAULT_NAME_PREFIX};

pub const PATTERN_KEY: &str = "PATTERN";
pub const RETENTION_DAYS_KEY: &str = "RETENTION_DAYS";
pub const REGION_OVERRIDE_KEY: &str = "REGION_OVERRIDE";
pub const DEFAULT_REGION_KEY: &str = "AWS_DEFAULT_REGION";
pub const DEST_ACCOUNT_KEY: &str = "DEST_ACCOUNTID";
pub const BACKUP_KMS_KEY: &str = "BACKUP_KMS";
pub const NAME_PREFIX_KEY: &str = "BACKUP_NAME_PREFIX";

pub const DEFAULT_SHARE_PATTERN: &str = "^stool.*$";
pub const DEFAULT_RETENTION_DAYS: u32 = 7;
const NO_REGION_OVERRIDE: &str = "NO";

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `REGION_OVERRIDE` wins unless it is `NO`; otherwise `AWS_DEFAULT_REGION`.
/// `None` leaves region resolution to the SDK's default provider chain.
pub fn resolve_region(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    match non_blank(lookup, REGION_OVERRIDE_KEY) {
        Some(region) if region != NO_REGION_OVERRIDE => Some(region),
        _ => non_blank(lookup, DEFAULT_REGION_KEY),
    }
}

fn name_prefix(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    match lookup(NAME_PREFIX_KEY) {
        Some(raw) => normalize_prefix(&raw),
        None => Some(DEFAULT_NAME_PREFIX.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareConfig {
    pub pattern: SnapshotPattern,
    pub region: Option<String>,
    pub dest_account_id: String,
    pub backup_kms: Option<String>,
    pub name_prefix: Option<String>,
}

impl ShareConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let pattern = non_blank(&lookup, PATTERN_KEY)
            .unwrap_or_else(|| DEFAULT_SHARE_PATTERN.to_string());
        let dest_account_id = non_blank(&lookup, DEST_ACCOUNT_KEY).ok_or(ConfigError::Missing {
            key: DEST_ACCOUNT_KEY,
        })?;

        Ok(Self {
            pattern: SnapshotPattern::parse(&pattern)?,
            region: resolve_region(&lookup),
            dest_account_id,
            backup_kms: non_blank(&lookup, BACKUP_KMS_KEY),
            name_prefix: name_prefix(&lookup),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurgeConfig {
    pub pattern: SnapshotPattern,
    pub region: Option<String>,
    pub retention_days: u32,
    pub name_prefix: Option<String>,
}

impl PurgeConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let pattern =
            non_blank(&lookup, PATTERN_KEY).unwrap_or_else(|| ALL_CLUSTERS.to_string());
        let retention_days = match non_blank(&lookup, RETENTION_DAYS_KEY) {
            Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
                key: RETENTION_DAYS_KEY,
                value: raw,
            })?,
            None => DEFAULT_RETENTION_DAYS,
        };

        Ok(Self {
            pattern: SnapshotPattern::parse(&pattern)?,
            region: resolve_region(&lookup),
            retention_days,
            name_prefix: name_prefix(&lookup),
        })
    }
}
