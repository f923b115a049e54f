use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use snapshot_tool_lambda::adapters::aws::{load_sdk_config, AwsRdsSnapshotApi};
use snapshot_tool_lambda::handlers::purge::handle_purge;
use snapshot_tool_lambda::handlers::{log_failures, success_response};
use snapshot_tool_lambda::logging::{init_logging, LOG_LEVEL_KEY};
use snapshot_tool_lambda::runtime::config::PurgeConfig;
use snapshot_tool_lambda::runtime::report::PURGE_JOB;
use tracing::error;

async fn handle_request(_event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = PurgeConfig::from_lookup(|key| std::env::var(key).ok())?;
    let sdk_config = load_sdk_config(config.region.clone()).await;
    let api = AwsRdsSnapshotApi::new(aws_sdk_rds::Client::new(&sdk_config));

    let report = handle_purge(&config, &api, Utc::now().naive_utc())?;
    log_failures(&report);
    let body = success_response(&report);
    report.into_result(PURGE_JOB).map_err(|failure| {
        error!(%failure, "snapshots pending delete");
        Error::from(failure)
    })?;
    Ok(body)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging(std::env::var(LOG_LEVEL_KEY).ok().as_deref());
    lambda_runtime::run(service_fn(handle_request)).await
}
