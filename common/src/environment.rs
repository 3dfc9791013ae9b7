// Worker environment contract
//
// Flags are encoded as "TRUE" or the empty string; workers treat a flag as
// set when the variable is present and non-empty.

use crate::driver::TrafficDriverConfig;
use crate::errors::EnvironmentError;
use std::collections::BTreeMap;

pub const RESOURCE_NAME: &str = "RESOURCE_NAME";
pub const READ: &str = "READ";
pub const WRITE: &str = "WRITE";

const FLAG_SET: &str = "TRUE";
const FLAG_UNSET: &str = "";

#[inline]
pub fn encode_flag(enabled: bool) -> &'static str {
    if enabled {
        FLAG_SET
    } else {
        FLAG_UNSET
    }
}

/// Environment handed to a traffic worker
pub fn derive_environment(config: &TrafficDriverConfig) -> BTreeMap<String, String> {
    BTreeMap::from([
        (RESOURCE_NAME.to_string(), config.target.name.clone()),
        (READ.to_string(), encode_flag(config.read).to_string()),
        (WRITE.to_string(), encode_flag(config.write).to_string()),
    ])
}

/// Settings a worker reads back from its environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEnvironment {
    pub resource_name: String,
    pub read: bool,
    pub write: bool,
}

impl WorkerEnvironment {
    pub fn from_map(vars: &BTreeMap<String, String>) -> Result<Self, EnvironmentError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Read the contract from the current process environment
    pub fn from_env() -> Result<Self, EnvironmentError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, EnvironmentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resource_name = lookup(RESOURCE_NAME)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EnvironmentError::MissingVariable(RESOURCE_NAME.to_string()))?;

        let is_set = |key: &str| lookup(key).is_some_and(|value| !value.is_empty());

        Ok(Self {
            resource_name,
            read: is_set(READ),
            write: is_set(WRITE),
        })
    }
}
