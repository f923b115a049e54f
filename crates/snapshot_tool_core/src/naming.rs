use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Format of the timestamp suffix on snapshots this tool creates.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";
pub const DEFAULT_NAME_PREFIX: &str = "stool";
const DISABLED_PREFIX: &str = "NONE";

fn timestamp_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| {
        Regex::new(r"(\d{4}-\d{2}-\d{2}-\d{2}-\d{2})$").expect("timestamp suffix regex is valid")
    })
}

/// Normalizes the configured name prefix; `NONE` and blank disable it.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == DISABLED_PREFIX {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds `<prefix>-<cluster>-<YYYY-MM-DD-HH-mm>`, or `<cluster>-<timestamp>`
/// without a prefix.
pub fn copy_snapshot_name(
    prefix: Option<&str>,
    cluster_identifier: &str,
    now: NaiveDateTime,
) -> String {
    let timestamp = now.format(TIMESTAMP_FORMAT);
    match prefix {
        Some(prefix) => format!("{prefix}-{cluster_identifier}-{timestamp}"),
        None => format!("{cluster_identifier}-{timestamp}"),
    }
}

/// Parses the creation time embedded at the end of a snapshot identifier.
///
/// Returns `None` for identifiers without a suffix or with an impossible date,
/// which keeps such snapshots out of any deletion decision.
pub fn parse_snapshot_timestamp(identifier: &str) -> Option<NaiveDateTime> {
    let captures = timestamp_suffix().captures(identifier)?;
    NaiveDateTime::parse_from_str(captures.get(1)?.as_str(), TIMESTAMP_FORMAT).ok()
}

/// True when the identifier starts with `<prefix>-`, as every copy name does.
pub fn has_name_marker(identifier: &str, prefix: &str) -> bool {
    identifier.starts_with(&format!("{prefix}-"))
}
