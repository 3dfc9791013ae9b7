// Configuration management with layered configuration (file, env)

use crate::driver::WorkerCode;
use crate::stack::StackDefinition;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub stack: StackDefinition,
    #[serde(default)]
    pub worker: WorkerCode,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    ///
    /// Driver read/write flags are checked during synthesis, not here.
    pub fn validate(&self) -> Result<(), String> {
        if self.stack.name.trim().is_empty() {
            return Err("Stack name cannot be empty".to_string());
        }

        let mut resource_ids = HashSet::new();
        for resource in &self.stack.resources {
            if resource.logical_id.is_empty() {
                return Err("Resource logical_id cannot be empty".to_string());
            }
            if resource.name.is_empty() {
                return Err(format!(
                    "Resource '{}' name cannot be empty",
                    resource.logical_id
                ));
            }
            if !resource_ids.insert(resource.logical_id.as_str()) {
                return Err(format!(
                    "Resource '{}' is declared more than once",
                    resource.logical_id
                ));
            }
        }

        if self.stack.drivers.iter().any(|driver| driver.id.is_empty()) {
            return Err("Driver id cannot be empty".to_string());
        }

        if self.worker.code_path.is_empty() {
            return Err("Worker code_path cannot be empty".to_string());
        }
        if self.worker.runtime.is_empty() {
            return Err("Worker runtime cannot be empty".to_string());
        }
        if self.worker.handler.is_empty() {
            return Err("Worker handler cannot be empty".to_string());
        }

        if self.observability.log_level.is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
