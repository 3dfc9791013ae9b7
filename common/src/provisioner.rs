// Provisioning collaborator interface and the recording (dry-run) implementation

use crate::errors::ProvisioningError;
use crate::models::{
    Capability, GrantRequest, ResourceRef, TriggerRule, WorkerFunction, WorkerIdentity,
};
use crate::telemetry::{record_function_created, record_grant_requested, record_rule_registered};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// External provisioning platform the traffic driver issues requests to
///
/// Requests are declarative: the platform records them and carries them out
/// later. Implementations must not deduplicate grant or rule requests.
pub trait Provisioner {
    /// Declare a worker function and return the identity grants are scoped to
    fn create_function(
        &mut self,
        function: &WorkerFunction,
    ) -> Result<WorkerIdentity, ProvisioningError>;

    /// Request a capability grant on `resource` for `grantee`
    fn grant(
        &mut self,
        resource: &ResourceRef,
        capability: Capability,
        grantee: &WorkerIdentity,
    ) -> Result<(), ProvisioningError>;

    /// Register a recurring trigger
    fn register_rule(&mut self, rule: &TriggerRule) -> Result<(), ProvisioningError>;
}

/// Everything a provisioning pass requested, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningPlan {
    pub stack: String,
    pub functions: Vec<PlannedFunction>,
    pub grants: Vec<GrantRequest>,
    pub rules: Vec<PlannedRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFunction {
    pub identity: WorkerIdentity,
    #[serde(flatten)]
    pub function: WorkerFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRule {
    #[serde(flatten)]
    pub rule: TriggerRule,
    /// Rendered rate expression, when the schedule has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl ProvisioningPlan {
    pub fn grants_for(&self, capability: Capability) -> usize {
        self.grants
            .iter()
            .filter(|grant| grant.capability == capability)
            .count()
    }
}

/// Provisioner that only records requests into a `ProvisioningPlan`
#[derive(Debug, Default)]
pub struct RecordingProvisioner {
    plan: ProvisioningPlan,
}

impl RecordingProvisioner {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            plan: ProvisioningPlan {
                stack: stack.into(),
                ..ProvisioningPlan::default()
            },
        }
    }

    pub fn plan(&self) -> &ProvisioningPlan {
        &self.plan
    }

    pub fn into_plan(self) -> ProvisioningPlan {
        self.plan
    }

    fn identity_for(&self, function_id: &str) -> WorkerIdentity {
        if self.plan.stack.is_empty() {
            WorkerIdentity(function_id.to_string())
        } else {
            WorkerIdentity(format!("{}/{}", self.plan.stack, function_id))
        }
    }

    fn is_known(&self, identity: &WorkerIdentity) -> bool {
        self.plan
            .functions
            .iter()
            .any(|planned| &planned.identity == identity)
    }
}

impl Provisioner for RecordingProvisioner {
    #[instrument(skip(self, function), fields(function_id = %function.id))]
    fn create_function(
        &mut self,
        function: &WorkerFunction,
    ) -> Result<WorkerIdentity, ProvisioningError> {
        let identity = self.identity_for(&function.id);
        if self.is_known(&identity) {
            return Err(ProvisioningError::DuplicateId(function.id.clone()));
        }

        info!(
            identity = %identity,
            runtime = %function.runtime,
            handler = %function.handler,
            "Worker function declared"
        );
        record_function_created(&self.plan.stack);

        self.plan.functions.push(PlannedFunction {
            identity: identity.clone(),
            function: function.clone(),
        });
        Ok(identity)
    }

    #[instrument(skip(self, resource, grantee), fields(resource = %resource.logical_id, grantee = %grantee))]
    fn grant(
        &mut self,
        resource: &ResourceRef,
        capability: Capability,
        grantee: &WorkerIdentity,
    ) -> Result<(), ProvisioningError> {
        if !self.is_known(grantee) {
            return Err(ProvisioningError::UnknownIdentity(grantee.to_string()));
        }

        info!(capability = %capability, "Capability grant requested");
        record_grant_requested(&self.plan.stack, capability);

        self.plan.grants.push(GrantRequest {
            resource: resource.clone(),
            capability,
            grantee: grantee.clone(),
        });
        Ok(())
    }

    #[instrument(skip(self, rule), fields(rule_id = %rule.id, target = %rule.target))]
    fn register_rule(&mut self, rule: &TriggerRule) -> Result<(), ProvisioningError> {
        if !self.is_known(&rule.target) {
            return Err(ProvisioningError::UnknownIdentity(rule.target.to_string()));
        }

        let expression = match rule.schedule.rate_expression() {
            Ok(expression) => Some(expression),
            Err(e) => {
                debug!(error = %e, "Schedule has no rate expression");
                None
            }
        };

        info!(
            interval_seconds = rule.schedule.interval_seconds(),
            expression = ?expression,
            "Trigger rule registered"
        );
        record_rule_registered(&self.plan.stack);

        self.plan.rules.push(PlannedRule {
            rule: rule.clone(),
            expression,
        });
        Ok(())
    }
}
