pub mod aws;
pub mod key_directory;
pub mod snapshot_api;
