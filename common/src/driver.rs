// Traffic driver: a worker function invoked once a minute that reads and/or
// writes a shared resource so the resource carries synthetic load.

use crate::environment::derive_environment;
use crate::errors::{ConfigurationError, DriverError};
use crate::models::{
    Capability, GrantRequest, ResourceRef, TriggerRule, WorkerFunction, WorkerIdentity,
};
use crate::provisioner::Provisioner;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const FUNCTION_SUFFIX: &str = "LambdaFunction";
const TICK_SUFFIX: &str = "Tick";

/// Which operations a driver performs against its target resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficDriverConfig {
    pub target: ResourceRef,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

impl TrafficDriverConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.read && !self.write {
            return Err(ConfigurationError::NoAccessRequested);
        }
        Ok(())
    }
}

/// Code location and entry point shared by all traffic workers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCode {
    pub code_path: String,
    pub runtime: String,
    pub handler: String,
}

impl Default for WorkerCode {
    fn default() -> Self {
        Self {
            code_path: "lambda".to_string(),
            runtime: "nodejs10.x".to_string(),
            handler: "index.handler".to_string(),
        }
    }
}

/// A provisioned traffic driver
///
/// Built once by [`TrafficDriver::provision`]; exposes no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficDriver {
    id: String,
    function: WorkerFunction,
    identity: WorkerIdentity,
    grants: Vec<GrantRequest>,
    rule: TriggerRule,
}

impl TrafficDriver {
    /// Validate `config`, then declare the worker, request grants and
    /// register a one-minute trigger.
    ///
    /// Nothing is requested from `provisioner` when validation fails.
    /// Provisioner errors are returned as-is and stop the pass; requests
    /// already issued are not rolled back.
    #[instrument(
        skip(config, code, provisioner),
        fields(target = %config.target.logical_id, read = config.read, write = config.write)
    )]
    pub fn provision(
        id: &str,
        config: &TrafficDriverConfig,
        code: &WorkerCode,
        provisioner: &mut dyn Provisioner,
    ) -> Result<Self, DriverError> {
        config.validate()?;

        let function = WorkerFunction {
            id: format!("{}/{}", id, FUNCTION_SUFFIX),
            code_path: code.code_path.clone(),
            runtime: code.runtime.clone(),
            handler: code.handler.clone(),
            environment: derive_environment(config),
        };
        let identity = provisioner.create_function(&function)?;
        debug!(identity = %identity, "Worker function created");

        let mut grants = Vec::with_capacity(2);
        if config.write {
            grants.push(request_grant(
                provisioner,
                &config.target,
                Capability::Write,
                &identity,
            )?);
        }
        if config.read {
            grants.push(request_grant(
                provisioner,
                &config.target,
                Capability::Read,
                &identity,
            )?);
        }

        let rule = TriggerRule {
            id: format!("{}/{}", id, TICK_SUFFIX),
            schedule: Schedule::every_minute(),
            target: identity.clone(),
        };
        provisioner.register_rule(&rule)?;

        info!(
            identity = %identity,
            grants = grants.len(),
            "Traffic driver provisioned"
        );

        Ok(Self {
            id: id.to_string(),
            function,
            identity,
            grants,
            rule,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn function(&self) -> &WorkerFunction {
        &self.function
    }

    pub fn identity(&self) -> &WorkerIdentity {
        &self.identity
    }

    pub fn grants(&self) -> &[GrantRequest] {
        &self.grants
    }

    pub fn rule(&self) -> &TriggerRule {
        &self.rule
    }
}

fn request_grant(
    provisioner: &mut dyn Provisioner,
    resource: &ResourceRef,
    capability: Capability,
    grantee: &WorkerIdentity,
) -> Result<GrantRequest, DriverError> {
    provisioner.grant(resource, capability, grantee)?;
    Ok(GrantRequest {
        resource: resource.clone(),
        capability,
        grantee: grantee.clone(),
    })
}
