use serde::{Deserialize, Serialize};

/// Sentinel tag marking a snapshot for a single share-and-copy pass.
pub const SHARE_TAG_KEY: &str = "shareAndCopy";
pub const SHARE_TAG_PENDING: &str = "YES";
pub const SHARE_TAG_DONE: &str = "No";

pub const CREATED_BY_TAG_KEY: &str = "CreatedBy";
pub const CREATED_BY_TAG_VALUE: &str = "Snapshot Tool for Aurora";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The tag written after a snapshot has been shared.
    pub fn share_done() -> Self {
        Self::new(SHARE_TAG_KEY, SHARE_TAG_DONE)
    }
}

fn has_tag(tags: &[Tag], key: &str, value: &str) -> bool {
    tags.iter().any(|tag| tag.key == key && tag.value == value)
}

/// True iff `shareAndCopy=YES` is present. The value match is exact.
pub fn search_tag_share(tags: &[Tag]) -> bool {
    has_tag(tags, SHARE_TAG_KEY, SHARE_TAG_PENDING)
}

pub fn search_tag_created(tags: &[Tag]) -> bool {
    has_tag(tags, CREATED_BY_TAG_KEY, CREATED_BY_TAG_VALUE)
}
