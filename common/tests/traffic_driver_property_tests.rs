// Property-based tests for traffic driver provisioning

use common::driver::{TrafficDriver, TrafficDriverConfig, WorkerCode};
use common::environment::{READ, RESOURCE_NAME, WRITE};
use common::errors::{ConfigurationError, DriverError, ProvisioningError};
use common::models::{Capability, ResourceRef, TriggerRule, WorkerFunction, WorkerIdentity};
use common::provisioner::Provisioner;
use proptest::prelude::*;

/// Mock provisioner that records every request it receives
#[derive(Default)]
struct MockProvisioner {
    functions: Vec<WorkerFunction>,
    grants: Vec<(ResourceRef, Capability, WorkerIdentity)>,
    rules: Vec<TriggerRule>,
    fail_on: Option<Stage>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Stage {
    Function,
    Grant,
    Rule,
}

impl MockProvisioner {
    fn failing_on(stage: Stage) -> Self {
        Self {
            fail_on: Some(stage),
            ..Self::default()
        }
    }

    fn grant_count(&self, capability: Capability) -> usize {
        self.grants
            .iter()
            .filter(|(_, granted, _)| *granted == capability)
            .count()
    }

    fn request_count(&self) -> usize {
        self.functions.len() + self.grants.len() + self.rules.len()
    }

    fn check(&self, stage: Stage) -> Result<(), ProvisioningError> {
        if self.fail_on == Some(stage) {
            return Err(ProvisioningError::Rejected(format!("{:?} unavailable", stage)));
        }
        Ok(())
    }
}

impl Provisioner for MockProvisioner {
    fn create_function(
        &mut self,
        function: &WorkerFunction,
    ) -> Result<WorkerIdentity, ProvisioningError> {
        self.check(Stage::Function)?;
        self.functions.push(function.clone());
        Ok(WorkerIdentity(format!(
            "{}#{}",
            function.id,
            self.functions.len()
        )))
    }

    fn grant(
        &mut self,
        resource: &ResourceRef,
        capability: Capability,
        grantee: &WorkerIdentity,
    ) -> Result<(), ProvisioningError> {
        self.check(Stage::Grant)?;
        self.grants
            .push((resource.clone(), capability, grantee.clone()));
        Ok(())
    }

    fn register_rule(&mut self, rule: &TriggerRule) -> Result<(), ProvisioningError> {
        self.check(Stage::Rule)?;
        self.rules.push(rule.clone());
        Ok(())
    }
}

fn resource_strategy() -> impl Strategy<Value = ResourceRef> {
    ("[A-Z][A-Za-z0-9]{2,15}", "[a-z][a-z0-9-]{2,30}")
        .prop_map(|(logical_id, name)| ResourceRef::new(logical_id, name))
}

fn driver_id_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z]{2,20}"
}

fn provision(
    id: &str,
    config: &TrafficDriverConfig,
    provisioner: &mut MockProvisioner,
) -> Result<TrafficDriver, DriverError> {
    TrafficDriver::provision(id, config, &WorkerCode::default(), provisioner)
}

// Property 1: Invalid configuration has no side effects
//
// For any target with read=false and write=false, provisioning fails with
// ConfigurationError and no request reaches the provisioner.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_1_invalid_config_has_no_side_effects(
        target in resource_strategy(),
        id in driver_id_strategy()
    ) {
        let config = TrafficDriverConfig { target, read: false, write: false };
        let mut provisioner = MockProvisioner::default();

        let result = provision(&id, &config, &mut provisioner);

        prop_assert_eq!(
            result.unwrap_err(),
            DriverError::Configuration(ConfigurationError::NoAccessRequested)
        );
        prop_assert_eq!(provisioner.request_count(), 0);
    }
}

// Property 2: Grants match requested access
//
// For any valid flag combination, exactly one grant per requested capability
// is issued, on the target, for the identity returned by the provisioner.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_2_grants_match_requested_access(
        target in resource_strategy(),
        id in driver_id_strategy(),
        (read, write) in prop::sample::select(vec![(true, false), (false, true), (true, true)])
    ) {
        let config = TrafficDriverConfig { target: target.clone(), read, write };
        let mut provisioner = MockProvisioner::default();

        let driver = provision(&id, &config, &mut provisioner).unwrap();

        prop_assert_eq!(provisioner.grant_count(Capability::Read), usize::from(read));
        prop_assert_eq!(provisioner.grant_count(Capability::Write), usize::from(write));
        for (resource, _, grantee) in &provisioner.grants {
            prop_assert_eq!(resource, &target);
            prop_assert_eq!(grantee, driver.identity());
        }
    }
}

// Property 3: Environment encodes flags as "TRUE" or empty string
//
// The worker environment carries exactly RESOURCE_NAME, READ and WRITE.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_3_environment_encoding(
        target in resource_strategy(),
        (read, write) in prop::sample::select(vec![(true, false), (false, true), (true, true)])
    ) {
        let config = TrafficDriverConfig { target: target.clone(), read, write };
        let mut provisioner = MockProvisioner::default();

        provision("Traffic", &config, &mut provisioner).unwrap();

        prop_assert_eq!(provisioner.functions.len(), 1);
        let env = &provisioner.functions[0].environment;
        prop_assert_eq!(env.len(), 3);
        prop_assert_eq!(&env[RESOURCE_NAME], &target.name);
        prop_assert_eq!(env[READ].as_str(), if read { "TRUE" } else { "" });
        prop_assert_eq!(env[WRITE].as_str(), if write { "TRUE" } else { "" });
    }
}

// Property 4: Exactly one 60 second trigger per driver
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_4_single_minute_trigger(
        target in resource_strategy(),
        id in driver_id_strategy(),
        (read, write) in prop::sample::select(vec![(true, false), (false, true), (true, true)])
    ) {
        let config = TrafficDriverConfig { target, read, write };
        let mut provisioner = MockProvisioner::default();

        let driver = provision(&id, &config, &mut provisioner).unwrap();

        prop_assert_eq!(provisioner.rules.len(), 1);
        prop_assert_eq!(provisioner.rules[0].schedule.interval_seconds(), 60);
        prop_assert_eq!(&provisioner.rules[0].target, driver.identity());
    }
}

// Property 5: No implicit deduplication
//
// Two drivers built from the same configuration against the same target
// issue two independent sets of requests.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn property_5_no_implicit_deduplication(
        target in resource_strategy(),
        (read, write) in prop::sample::select(vec![(true, false), (false, true), (true, true)])
    ) {
        let config = TrafficDriverConfig { target, read, write };
        let mut provisioner = MockProvisioner::default();

        let first = provision("First", &config, &mut provisioner).unwrap();
        let second = provision("Second", &config, &mut provisioner).unwrap();

        prop_assert_ne!(first.identity(), second.identity());
        prop_assert_eq!(provisioner.functions.len(), 2);
        prop_assert_eq!(provisioner.rules.len(), 2);
        prop_assert_eq!(provisioner.grant_count(Capability::Read), 2 * usize::from(read));
        prop_assert_eq!(provisioner.grant_count(Capability::Write), 2 * usize::from(write));
    }
}

// Property 6: Provisioner failures propagate unchanged and stop the pass
#[test]
fn property_6_provisioner_failure_propagates() {
    let config = TrafficDriverConfig {
        target: ResourceRef::new("DynamoTable1", "table"),
        read: true,
        write: true,
    };

    for stage in [Stage::Function, Stage::Grant, Stage::Rule] {
        let mut provisioner = MockProvisioner::failing_on(stage);
        let err = provision("WriteReadTraffic", &config, &mut provisioner).unwrap_err();

        assert_eq!(
            err,
            DriverError::Provisioning(ProvisioningError::Rejected(format!(
                "{:?} unavailable",
                stage
            )))
        );

        match stage {
            Stage::Function => assert_eq!(provisioner.request_count(), 0),
            Stage::Grant => {
                assert_eq!(provisioner.functions.len(), 1);
                assert!(provisioner.grants.is_empty());
                assert!(provisioner.rules.is_empty());
            }
            Stage::Rule => {
                assert_eq!(provisioner.grants.len(), 2);
                assert!(provisioner.rules.is_empty());
            }
        }
    }
}
