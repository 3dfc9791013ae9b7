// Core data models for traffic driver provisioning

use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reference to an externally owned stateful resource (e.g. a table)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Logical id the resource is declared under
    pub logical_id: String,
    /// Physical identifier exported to workers
    pub name: String,
}

impl ResourceRef {
    pub fn new(logical_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            name: name.into(),
        }
    }
}

/// Operation a capability grant authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Read => f.write_str("read"),
            Capability::Write => f.write_str("write"),
        }
    }
}

/// Identity assigned to a worker function by the provisioning collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerIdentity(pub String);

impl WorkerIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Description of a worker function to be provisioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerFunction {
    pub id: String,
    pub code_path: String,
    pub runtime: String,
    pub handler: String,
    pub environment: BTreeMap<String, String>,
}

/// A capability grant requested on a resource for a worker identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub resource: ResourceRef,
    pub capability: Capability,
    pub grantee: WorkerIdentity,
}

/// A recurring trigger that invokes a worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub id: String,
    pub schedule: Schedule,
    pub target: WorkerIdentity,
}
