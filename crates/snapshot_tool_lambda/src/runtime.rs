pub use snapshot_tool_core::{
    config, error, filter, kms, naming, report, retention, snapshot, tags,
};
