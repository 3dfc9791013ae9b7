// Error handling framework
// Library errors are thiserror enums; binaries wrap them with anyhow.

use thiserror::Error;

/// Driver configuration errors, raised before any provisioning request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("At least \"read\" or \"write\" must be set")]
    NoAccessRequested,
}

/// Errors reported by the provisioning collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("Duplicate resource id: {0}")]
    DuplicateId(String),

    #[error("Unknown worker identity: {0}")]
    UnknownIdentity(String),

    #[error("Provisioning request rejected: {0}")]
    Rejected(String),
}

/// Errors raised while building a single traffic driver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

/// Schedule-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid schedule configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors raised when a worker reads its environment contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
}

/// Stack synthesis errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("Driver '{0}' is declared more than once")]
    DuplicateDriver(String),

    #[error("Driver '{driver}' references unknown resource '{resource}'")]
    UnknownResource { driver: String, resource: String },

    #[error("Driver '{id}' failed: {source}")]
    Driver {
        id: String,
        #[source]
        source: DriverError,
    },
}
