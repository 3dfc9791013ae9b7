// Provisioner binary entry point
//
// Usage: provisioner [CONFIG_DIR]
// Synthesizes the configured traffic driver stack against the recording
// provisioner and prints the resulting plan as JSON on stdout.

use anyhow::{Context, Result};
use common::config::Settings;
use common::provisioner::RecordingProvisioner;
use common::stack::synthesize;
use common::telemetry::init_logging;
use tracing::{error, info};

fn main() -> Result<()> {
    let config_dir = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());

    let settings = Settings::load_from_path(&config_dir)
        .with_context(|| format!("Failed to load configuration from '{}'", config_dir))?;

    init_logging(&settings.observability.log_level)?;

    info!(
        config_dir = %config_dir,
        stack = %settings.stack.name,
        resources = settings.stack.resources.len(),
        drivers = settings.stack.drivers.len(),
        "Configuration loaded"
    );

    settings.validate().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let mut provisioner = RecordingProvisioner::new(&settings.stack.name);
    let drivers = synthesize(&settings.stack, &settings.worker, &mut provisioner).map_err(|e| {
        error!(error = %e, "Stack synthesis failed");
        e
    })?;

    let plan = provisioner.into_plan();
    info!(
        drivers = drivers.len(),
        functions = plan.functions.len(),
        grants = plan.grants.len(),
        rules = plan.rules.len(),
        "Provisioning plan ready"
    );

    let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
    println!("{}", json);

    Ok(())
}
