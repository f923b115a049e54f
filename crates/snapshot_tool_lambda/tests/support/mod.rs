#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use snapshot_tool_lambda::adapters::key_directory::KeyDirectory;
use snapshot_tool_lambda::adapters::snapshot_api::{
    CopiedSnapshot, CopyRequest, SnapshotApi, SnapshotPage,
};
use snapshot_tool_lambda::runtime::kms::KeyKind;
use snapshot_tool_lambda::runtime::snapshot::{
    ClusterSnapshot, SnapshotStatus, MANUAL_SNAPSHOT_TYPE,
};
use snapshot_tool_lambda::runtime::tags::Tag;

pub const SOURCE_ACCOUNT: &str = "111111111111";
pub const DEST_ACCOUNT: &str = "222222222222";
pub const DEFAULT_KEY: &str = "arn:aws:kms:us-east-1:111111111111:key/aws-rds-default";
pub const CUSTOM_KEY: &str = "arn:aws:kms:us-east-1:111111111111:key/custom";
pub const FOREIGN_KEY: &str = "arn:aws:kms:us-east-1:333333333333:key/foreign";
pub const BACKUP_KEY: &str = "arn:aws:kms:us-east-1:222222222222:key/backup";

pub fn arn_for(identifier: &str) -> String {
    format!("arn:aws:rds:us-east-1:{SOURCE_ACCOUNT}:cluster-snapshot:{identifier}")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid test datetime")
}

/// Builder for snapshots seeded into [`FakeAws`].
pub struct SnapshotSeed {
    snapshot: ClusterSnapshot,
    tags: Vec<Tag>,
}

impl SnapshotSeed {
    pub fn manual(identifier: &str, cluster_identifier: &str) -> Self {
        Self {
            snapshot: ClusterSnapshot {
                identifier: identifier.to_string(),
                arn: arn_for(identifier),
                cluster_identifier: cluster_identifier.to_string(),
                status: SnapshotStatus::Available,
                snapshot_type: MANUAL_SNAPSHOT_TYPE.to_string(),
                engine: "aurora-postgresql".to_string(),
                storage_encrypted: false,
                kms_key_id: None,
            },
            tags: Vec::new(),
        }
    }

    pub fn encrypted_with(mut self, key_id: &str) -> Self {
        self.snapshot.storage_encrypted = true;
        self.snapshot.kms_key_id = Some(key_id.to_string());
        self
    }

    pub fn status(mut self, status: SnapshotStatus) -> Self {
        self.snapshot.status = status;
        self
    }

    pub fn snapshot_type(mut self, snapshot_type: &str) -> Self {
        self.snapshot.snapshot_type = snapshot_type.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Describe { marker: Option<String> },
    ListTags { arn: String },
    AddTags { arn: String, tags: Vec<Tag> },
    Copy(CopyRequest),
    Share { snapshot: String, account_id: String },
    Delete { identifier: String },
    ClassifyKey { key_id: String },
}

#[derive(Default)]
struct State {
    snapshots: Vec<ClusterSnapshot>,
    tags: BTreeMap<String, Vec<Tag>>,
    restore_accounts: BTreeMap<String, Vec<String>>,
    calls: Vec<Call>,
}

/// In-memory RDS and KMS double that records every call.
pub struct FakeAws {
    state: Mutex<State>,
    page_size: usize,
    keys: BTreeMap<String, KeyKind>,
    failing_copies: BTreeSet<String>,
    failing_shares: BTreeSet<String>,
    failing_deletes: BTreeSet<String>,
    failing_tag_reads: BTreeSet<String>,
    failing_tag_writes: BTreeSet<String>,
    fail_listing: bool,
}

impl FakeAws {
    pub fn new(seeds: Vec<SnapshotSeed>) -> Self {
        let mut state = State::default();
        for seed in seeds {
            state.tags.insert(seed.snapshot.arn.clone(), seed.tags);
            state.snapshots.push(seed.snapshot);
        }
        Self {
            state: Mutex::new(state),
            page_size: 2,
            keys: BTreeMap::from([
                (DEFAULT_KEY.to_string(), KeyKind::AwsManaged),
                (CUSTOM_KEY.to_string(), KeyKind::CustomerManaged),
            ]),
            failing_copies: BTreeSet::new(),
            failing_shares: BTreeSet::new(),
            failing_deletes: BTreeSet::new(),
            failing_tag_reads: BTreeSet::new(),
            failing_tag_writes: BTreeSet::new(),
            fail_listing: false,
        }
    }

    pub fn fail_copy_of(mut self, source_identifier: &str) -> Self {
        self.failing_copies.insert(arn_for(source_identifier));
        self
    }

    pub fn fail_share_of(mut self, snapshot: &str) -> Self {
        self.failing_shares.insert(snapshot.to_string());
        self
    }

    pub fn fail_delete_of(mut self, identifier: &str) -> Self {
        self.failing_deletes.insert(identifier.to_string());
        self
    }

    pub fn fail_tag_read_of(mut self, identifier: &str) -> Self {
        self.failing_tag_reads.insert(arn_for(identifier));
        self
    }

    pub fn fail_tag_write_of(mut self, arn: &str) -> Self {
        self.failing_tag_writes.insert(arn.to_string());
        self
    }

    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().expect("poisoned mutex").calls.clone()
    }

    pub fn snapshot_identifiers(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .snapshots
            .iter()
            .map(|snapshot| snapshot.identifier.clone())
            .collect()
    }

    pub fn snapshot(&self, identifier: &str) -> Option<ClusterSnapshot> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .snapshots
            .iter()
            .find(|snapshot| snapshot.identifier == identifier)
            .cloned()
    }

    pub fn tag_value(&self, arn: &str, key: &str) -> Option<String> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .tags
            .get(arn)
            .and_then(|tags| tags.iter().find(|tag| tag.key == key))
            .map(|tag| tag.value.clone())
    }

    pub fn restore_accounts(&self, snapshot: &str) -> Vec<String> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .restore_accounts
            .get(snapshot)
            .cloned()
            .unwrap_or_default()
    }

    /// Calls other than reads, i.e. everything that changes the inventory.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::AddTags { .. } | Call::Copy(_) | Call::Share { .. } | Call::Delete { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().expect("poisoned mutex").calls.push(call);
    }
}

impl SnapshotApi for FakeAws {
    fn describe_cluster_snapshots(
        &self,
        snapshot_type: &str,
        marker: Option<&str>,
    ) -> Result<SnapshotPage, String> {
        self.record(Call::Describe {
            marker: marker.map(str::to_string),
        });
        if self.fail_listing {
            return Err("Throttling: rate exceeded".to_string());
        }

        let state = self.state.lock().expect("poisoned mutex");
        let start = match marker {
            Some(value) => value
                .parse::<usize>()
                .map_err(|_| format!("invalid marker {value}"))?,
            None => 0,
        };
        let matching: Vec<&ClusterSnapshot> = state
            .snapshots
            .iter()
            .filter(|snapshot| snapshot.snapshot_type == snapshot_type)
            .collect();
        let end = (start + self.page_size).min(matching.len());
        Ok(SnapshotPage {
            snapshots: matching[start.min(end)..end]
                .iter()
                .map(|snapshot| (*snapshot).clone())
                .collect(),
            marker: (end < matching.len()).then(|| end.to_string()),
        })
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, String> {
        self.record(Call::ListTags {
            arn: arn.to_string(),
        });
        if self.failing_tag_reads.contains(arn) {
            return Err(format!("AccessDenied: cannot read tags of {arn}"));
        }
        Ok(self
            .state
            .lock()
            .expect("poisoned mutex")
            .tags
            .get(arn)
            .cloned()
            .unwrap_or_default())
    }

    fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), String> {
        self.record(Call::AddTags {
            arn: arn.to_string(),
            tags: tags.to_vec(),
        });
        if self.failing_tag_writes.contains(arn) {
            return Err(format!("AccessDenied: cannot tag {arn}"));
        }
        let mut state = self.state.lock().expect("poisoned mutex");
        let existing = state.tags.entry(arn.to_string()).or_default();
        for tag in tags {
            match existing.iter_mut().find(|current| current.key == tag.key) {
                Some(current) => current.value = tag.value.clone(),
                None => existing.push(tag.clone()),
            }
        }
        Ok(())
    }

    fn copy_snapshot(&self, request: &CopyRequest) -> Result<CopiedSnapshot, String> {
        self.record(Call::Copy(request.clone()));
        if self.failing_copies.contains(&request.source_arn) {
            return Err(format!(
                "KMSKeyNotAccessibleFault: cannot use {}",
                request.kms_key_id
            ));
        }

        let mut state = self.state.lock().expect("poisoned mutex");
        let source = state
            .snapshots
            .iter()
            .find(|snapshot| snapshot.arn == request.source_arn)
            .cloned()
            .ok_or_else(|| format!("DBClusterSnapshotNotFound: {}", request.source_arn))?;
        if state
            .snapshots
            .iter()
            .any(|snapshot| snapshot.identifier == request.target_identifier)
        {
            return Err(format!(
                "DBClusterSnapshotAlreadyExistsFault: {}",
                request.target_identifier
            ));
        }
        let arn = arn_for(&request.target_identifier);
        let copy = ClusterSnapshot {
            identifier: request.target_identifier.clone(),
            arn: arn.clone(),
            status: SnapshotStatus::Creating,
            storage_encrypted: true,
            kms_key_id: Some(request.kms_key_id.clone()),
            ..source
        };
        let source_tags = state.tags.get(&request.source_arn).cloned().unwrap_or_default();
        state.tags.insert(arn.clone(), source_tags);
        state.snapshots.push(copy);

        Ok(CopiedSnapshot {
            identifier: request.target_identifier.clone(),
            arn,
        })
    }

    fn share_snapshot(&self, snapshot: &str, account_id: &str) -> Result<(), String> {
        self.record(Call::Share {
            snapshot: snapshot.to_string(),
            account_id: account_id.to_string(),
        });
        if self.failing_shares.contains(snapshot) {
            return Err(format!("InvalidDBClusterSnapshotState: {snapshot}"));
        }
        self.state
            .lock()
            .expect("poisoned mutex")
            .restore_accounts
            .entry(snapshot.to_string())
            .or_default()
            .push(account_id.to_string());
        Ok(())
    }

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String> {
        self.record(Call::Delete {
            identifier: identifier.to_string(),
        });
        if self.failing_deletes.contains(identifier) {
            return Err(format!("InvalidDBClusterSnapshotState: {identifier}"));
        }
        let mut state = self.state.lock().expect("poisoned mutex");
        let before = state.snapshots.len();
        state
            .snapshots
            .retain(|snapshot| snapshot.identifier != identifier);
        if state.snapshots.len() == before {
            return Err(format!("DBClusterSnapshotNotFound: {identifier}"));
        }
        Ok(())
    }
}

impl KeyDirectory for FakeAws {
    fn classify_key(&self, key_id: &str) -> Result<KeyKind, String> {
        self.record(Call::ClassifyKey {
            key_id: key_id.to_string(),
        });
        self.keys
            .get(key_id)
            .copied()
            .ok_or_else(|| format!("NotFoundException: key {key_id} does not exist"))
    }
}
