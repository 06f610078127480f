//! End-to-end scenarios over YAML fixtures

use super::*;
use dpcfg_core::{InterfaceKind, UnnumberedError};
use dpcfg_types::{AdminState, EncapsulationConfig, Interface};

fn load(doc: &str) -> Config {
    serde_yaml::from_str(doc).unwrap()
}

#[test]
fn test_valid_configuration_passes() {
    let config = load(include_str!("../testdata/valid.yaml"));
    let (pass, diagnostics) = Validator::new().validate(&config);

    assert!(pass, "unexpected diagnostics: {:?}", diagnostics);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_empty_configuration_is_trivially_valid() {
    let config = load("{}");
    assert_eq!(Validator::new().validate(&config), (true, Vec::new()));
}

#[test]
fn test_mtu_inherited_from_physical() {
    let config = load(include_str!("../testdata/mtu_inheritance.yaml"));
    let policy = ValidationPolicy::default();
    let ctx = ValidationContext::new(&config, &policy);

    assert_eq!(ctx.attributes().mtu("Gi1.200"), Some(9216));
    assert_eq!(
        ctx.hierarchy.classify("Gi1.200"),
        Some(InterfaceKind::SubInterface)
    );
    assert!(Validator::new().valid_config(&config));
}

#[test]
fn test_sibling_collision_reported_per_interface() {
    let config = load(include_str!("../testdata/encapsulation_collision.yaml"));
    let policy = ValidationPolicy::default();
    let ctx = ValidationContext::new(&config, &policy);
    let model = ctx.encapsulation();

    assert!(!model.is_unique_among_siblings("Gi1.100"));
    assert!(!model.is_unique_among_siblings("Gi1.101"));
    assert!(model.is_unique_among_siblings("Gi1.102"));

    let report = Validator::new().validate_report(&config);
    assert!(!report.is_valid());
    assert_eq!(report.count(ViolationKind::EncapsulationCollision), 2);
    assert_eq!(report.violations().len(), 2);
}

#[test]
fn test_loopback_address_requires_lcp() {
    let config = load(include_str!("../testdata/loopback_missing_lcp.yaml"));
    let report = Validator::new().validate_report(&config);

    assert_eq!(report.count(ViolationKind::LoopbackMissingLcp), 1);
    let (pass, diagnostics) = report.into_result();
    assert!(!pass);
    assert!(diagnostics.iter().any(|d| d.contains("loop0")));
}

#[test]
fn test_physical_down_forces_descendants_down() {
    let config = load(include_str!("../testdata/admin_state.yaml"));
    let policy = ValidationPolicy::default();
    let ctx = ValidationContext::new(&config, &policy);
    let attributes = ctx.attributes();

    for name in ["xe0", "xe0.100", "xe0.100.200"] {
        assert_eq!(
            attributes.effective_admin_state(name),
            Some(AdminState::Down),
            "{}",
            name
        );
    }
    assert!(attributes.is_admin_up("xe1.100"));
}

#[test]
fn test_unnumbered_two_cycle() {
    let config = load(include_str!("../testdata/unnumbered_cycle.yaml"));
    let policy = ValidationPolicy::default();
    let ctx = ValidationContext::new(&config, &policy);
    let resolver = ctx.unnumbered();

    assert!(matches!(
        resolver.resolve("xe0"),
        Err(UnnumberedError::CycleDetected { .. })
    ));
    let source = resolver.resolve("xe2").unwrap();
    assert_eq!(source.name, "xe4");
    assert_eq!(source.hops, 2);

    let report = Validator::new().validate_report(&config);
    let cycle = ViolationKind::UnnumberedUnresolvable(UnresolvedReason::Cycle);
    assert_eq!(report.count(cycle), 2);
    assert_eq!(report.violations().len(), 2);
}

#[test]
fn test_consistent_l2xc_is_a_bijection() {
    let config = load(include_str!("../testdata/valid.yaml"));
    let policy = ValidationPolicy::default();
    let ctx = ValidationContext::new(&config, &policy);

    assert!(ctx.registry.l2xc_violations(false).is_empty());
    assert_eq!(
        ctx.hierarchy.l2xc_interfaces().len(),
        ctx.hierarchy.l2xc_targets().len()
    );
}

#[test]
fn test_mutual_cross_connect_needs_reciprocal_policy() {
    let config = load(
        r#"
interfaces:
  GigabitEthernet3/0/0:
    l2xc: GigabitEthernet3/0/1
  GigabitEthernet3/0/1:
    l2xc: GigabitEthernet3/0/0
"#,
    );

    let report = Validator::new().validate_report(&config);
    assert_eq!(report.count(ViolationKind::L2xcInconsistent), 2);

    let lenient = Validator::with_policy(ValidationPolicy {
        allow_reciprocal_l2xc: true,
        ..Default::default()
    });
    let (pass, diagnostics) = lenient.validate(&config);
    assert!(pass, "unexpected diagnostics: {:?}", diagnostics);
}

#[test]
fn test_dangling_parent_reported_once() {
    let config = load(
        r#"
interfaces:
  xe0.100: {}
  xe0.100.200: {}
"#,
    );
    let report = Validator::new().validate_report(&config);

    let missing: Vec<&str> = report
        .violations()
        .iter()
        .filter(|v| v.kind == ViolationKind::SchemaAssumptionViolated)
        .map(|v| v.subject.as_str())
        .collect();
    assert_eq!(missing, vec!["xe0.100"]);
}

#[test]
fn test_exact_match_policy_is_configurable() {
    let mut config = Config::default();
    config.interfaces.insert("xe0".to_string(), Interface::default());
    config.interfaces.insert(
        "xe0.100".to_string(),
        Interface {
            encapsulation: Some(EncapsulationConfig {
                dot1q: Some(100),
                exact_match: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        },
    );

    assert!(Validator::new().validate(&config).0);

    let strict = Validator::with_policy(ValidationPolicy {
        exact_match_requires_inner: true,
        ..Default::default()
    });
    let report = strict.validate_report(&config);
    assert_eq!(report.count(ViolationKind::EncapsulationMalformed), 1);
}

struct RequireDescription;

impl Rule for RequireDescription {
    fn name(&self) -> &str {
        "require-description"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        for (name, iface) in &ctx.config.interfaces {
            if iface.description.is_none() {
                report.push(
                    ViolationKind::Custom,
                    name,
                    format!("Interface {} has no description", name),
                );
            }
        }
    }
}

#[test]
fn test_custom_rule_runs_last() {
    let config = load(include_str!("../testdata/encapsulation_collision.yaml"));
    let mut validator = Validator::new();
    validator.add_rule(RequireDescription);

    assert_eq!(validator.rule_names().last(), Some(&"require-description"));

    let report = validator.validate_report(&config);
    assert_eq!(report.count(ViolationKind::Custom), 4);
    let kinds: Vec<ViolationKind> = report.violations().iter().map(|v| v.kind).collect();
    assert_eq!(kinds[..2], [ViolationKind::EncapsulationCollision; 2]);
    assert!(kinds[2..].iter().all(|k| *k == ViolationKind::Custom));
}

#[test]
fn test_runs_do_not_share_state() {
    let validator = Validator::new();
    let first = load(include_str!("../testdata/encapsulation_collision.yaml"));
    let second = load(include_str!("../testdata/valid.yaml"));

    let before = validator.validate(&first);
    assert!(validator.validate(&second).0);
    assert_eq!(validator.validate(&first), before);
}
