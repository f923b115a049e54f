use tracing::Level;

pub const LOG_LEVEL_KEY: &str = "LOG_LEVEL";

/// Maps `LOG_LEVEL` to a tracing level. `WARNING` and `CRITICAL` are accepted
/// as aliases of `WARN` and `ERROR`. Unknown or missing values log errors only.
pub fn parse_log_level(raw: Option<&str>) -> Level {
    let Some(raw) = raw else {
        return Level::ERROR;
    };
    match raw.trim().to_ascii_uppercase().as_str() {
        "WARNING" => Level::WARN,
        "CRITICAL" => Level::ERROR,
        other => other.parse().unwrap_or(Level::ERROR),
    }
}

pub fn init_logging(raw_level: Option<&str>) {
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_log_level(raw_level))
        // disable printing the name of the module in every log line.
        .with_target(false)
        // CloudWatch adds the ingestion time.
        .without_time()
        .try_init();
}
