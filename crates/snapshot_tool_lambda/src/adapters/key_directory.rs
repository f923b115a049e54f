use crate::runtime::kms::{Encryption, KeyKind};
use crate::runtime::snapshot::ClusterSnapshot;

/// Resolves who manages a KMS key in the configured region.
pub trait KeyDirectory {
    /// Fails when the key cannot be described, e.g. it belongs to another account.
    fn classify_key(&self, key_id: &str) -> Result<KeyKind, String>;
}

pub fn snapshot_encryption(directory: &impl KeyDirectory, snapshot: &ClusterSnapshot) -> Encryption {
    match snapshot.encryption_key() {
        None => Encryption::Unencrypted,
        Some(key_id) => match directory.classify_key(key_id) {
            Ok(kind) => Encryption::Classified(kind),
            Err(error) => Encryption::Unresolved(error),
        },
    }
}
