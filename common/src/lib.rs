// Common library for traffic driver provisioning, shared by the provisioner
// binary and the integration tests

pub mod config;
pub mod driver;
pub mod environment;
pub mod errors;
pub mod models;
pub mod provisioner;
pub mod schedule;
pub mod stack;
pub mod telemetry;
