// Stack synthesis: resolves driver definitions against declared resources and
// provisions every driver in declaration order.

use crate::driver::{TrafficDriver, TrafficDriverConfig, WorkerCode};
use crate::errors::StackError;
use crate::models::ResourceRef;
use crate::provisioner::Provisioner;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Declarative description of a stack of traffic drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDefinition {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceRef>,
    #[serde(default)]
    pub drivers: Vec<DriverDefinition>,
}

/// A traffic driver as declared in settings, referencing a resource by logical id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDefinition {
    pub id: String,
    pub resource: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

impl StackDefinition {
    pub fn resource(&self, logical_id: &str) -> Option<&ResourceRef> {
        self.resources
            .iter()
            .find(|resource| resource.logical_id == logical_id)
    }

    /// Resolve every driver's target and validate its configuration
    ///
    /// Issues no provisioning requests.
    pub fn resolve(&self) -> Result<Vec<(&str, TrafficDriverConfig)>, StackError> {
        let mut seen = HashSet::new();
        self.drivers
            .iter()
            .map(|driver| {
                if !seen.insert(driver.id.as_str()) {
                    return Err(StackError::DuplicateDriver(driver.id.clone()));
                }

                let target = self
                    .resource(&driver.resource)
                    .ok_or_else(|| StackError::UnknownResource {
                        driver: driver.id.clone(),
                        resource: driver.resource.clone(),
                    })?;

                let config = TrafficDriverConfig {
                    target: target.clone(),
                    read: driver.read,
                    write: driver.write,
                };
                config.validate().map_err(|e| StackError::Driver {
                    id: driver.id.clone(),
                    source: e.into(),
                })?;

                Ok((driver.id.as_str(), config))
            })
            .collect()
    }
}

impl Default for StackDefinition {
    /// One table carrying write traffic and combined write/read traffic
    fn default() -> Self {
        Self {
            name: "watchful-example".to_string(),
            resources: vec![ResourceRef::new(
                "DynamoTable1",
                "watchful-example-DynamoTable1",
            )],
            drivers: vec![
                DriverDefinition {
                    id: "WriteTraffic".to_string(),
                    resource: "DynamoTable1".to_string(),
                    read: false,
                    write: true,
                },
                DriverDefinition {
                    id: "WriteReadTraffic".to_string(),
                    resource: "DynamoTable1".to_string(),
                    read: true,
                    write: true,
                },
            ],
        }
    }
}

/// Provision every driver of `stack`
///
/// All drivers are resolved and validated before the first request is issued,
/// so a bad definition anywhere in the stack leaves the provisioner untouched.
#[instrument(skip_all, fields(stack = %stack.name, drivers = stack.drivers.len()))]
pub fn synthesize(
    stack: &StackDefinition,
    code: &WorkerCode,
    provisioner: &mut dyn Provisioner,
) -> Result<Vec<TrafficDriver>, StackError> {
    let resolved = stack.resolve()?;

    let mut drivers = Vec::with_capacity(resolved.len());
    for (id, config) in resolved {
        let driver =
            TrafficDriver::provision(id, &config, code, provisioner).map_err(|e| {
                StackError::Driver {
                    id: id.to_string(),
                    source: e,
                }
            })?;
        drivers.push(driver);
    }

    info!(drivers = drivers.len(), "Stack synthesized");
    Ok(drivers)
}
