// Telemetry module for structured logging and provisioning metrics

use crate::models::Capability;
use anyhow::Result;
use metrics::{counter, describe_counter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize structured logging with JSON formatting
///
/// Logs are written to stderr so stdout stays free for the synthesized plan.
/// `RUST_LOG` takes precedence over `log_level` when set.
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| level_filter(log_level))?;

    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_current_span(true)
        .with_span_list(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    describe_metrics();

    tracing::info!(log_level = log_level, "Structured logging initialized");

    Ok(())
}

/// Build a filter from a configured level or directive list, e.g. `info,common=debug`
fn level_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))
}

fn describe_metrics() {
    describe_counter!(
        "traffic_driver_functions_total",
        "Total number of worker functions declared"
    );
    describe_counter!(
        "traffic_driver_grants_total",
        "Total number of capability grants requested"
    );
    describe_counter!(
        "traffic_driver_rules_total",
        "Total number of trigger rules registered"
    );
}

#[inline]
pub fn record_function_created(stack: &str) {
    counter!("traffic_driver_functions_total", "stack" => stack.to_string()).increment(1);
}

#[inline]
pub fn record_grant_requested(stack: &str, capability: Capability) {
    counter!(
        "traffic_driver_grants_total",
        "stack" => stack.to_string(),
        "capability" => capability.to_string()
    )
    .increment(1);
}

#[inline]
pub fn record_rule_registered(stack: &str) {
    counter!("traffic_driver_rules_total", "stack" => stack.to_string()).increment(1);
}
