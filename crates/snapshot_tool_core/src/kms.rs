use serde::{Deserialize, Serialize};

/// Who manages the KMS key protecting a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// The account's AWS-managed default key; it cannot be shared across accounts.
    AwsManaged,
    CustomerManaged,
}

impl KeyKind {
    /// Maps the `KeyManager` field of a key description.
    pub fn from_key_manager(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("AWS") {
            Self::AwsManaged
        } else {
            Self::CustomerManaged
        }
    }
}

/// Encryption state of a snapshot as seen by the share workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encryption {
    Unencrypted,
    Classified(KeyKind),
    /// The key could not be described, typically because it belongs to
    /// another account.
    Unresolved(String),
}

/// How a snapshot reaches the destination account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareRoute {
    Direct,
    CopyWithKey { kms_key_id: String },
}

/// Only snapshots under the default key are re-encrypted, and only when a
/// destination key is configured. Unresolved keys are shared directly.
pub fn share_route(encryption: &Encryption, backup_kms: Option<&str>) -> ShareRoute {
    match (encryption, backup_kms) {
        (Encryption::Classified(KeyKind::AwsManaged), Some(kms_key_id)) => ShareRoute::CopyWithKey {
            kms_key_id: kms_key_id.to_string(),
        },
        _ => ShareRoute::Direct,
    }
}
