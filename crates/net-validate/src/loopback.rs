//! Loopback checks

use regex::Regex;

use dpcfg_core::LcpOwner;

use crate::report::{ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

const LOOPBACK_INSTANCE_MAX: u32 = 4095;

pub struct LoopbackRule {
    name_regex: Regex,
}

impl LoopbackRule {
    pub fn new() -> Self {
        Self {
            name_regex: Regex::new(r"^loop(\d+)$").expect("loopback name pattern compiles"),
        }
    }

    /// Instance number of a `loop<N>` name
    pub fn instance(&self, name: &str) -> Option<u32> {
        let caps = self.name_regex.captures(name)?;
        caps.get(1)?
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|instance| *instance <= LOOPBACK_INSTANCE_MAX)
    }
}

impl Default for LoopbackRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LoopbackRule {
    fn name(&self) -> &str {
        "loopback"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        for (name, lo) in &ctx.config.loopbacks {
            log::debug!("checking loopback {}", name);

            if self.instance(name).is_none() {
                report.push(
                    ViolationKind::LoopbackInvalid,
                    name,
                    format!(
                        "Loopback {} name must be loop<N> with N at most {}",
                        name, LOOPBACK_INSTANCE_MAX
                    ),
                );
            }

            match lo.lcp.as_deref() {
                None if lo.has_addresses() => report.push(
                    ViolationKind::LoopbackMissingLcp,
                    name,
                    format!("Loopback {} has an address but no LCP", name),
                ),
                Some(lcp) if !ctx.registry.lcp_is_unique(lcp) => {
                    let others: Vec<String> = ctx
                        .registry
                        .lcp_owners(lcp)
                        .iter()
                        .filter(|owner| **owner != LcpOwner::Loopback(name))
                        .map(|owner| owner.to_string())
                        .collect();
                    report.push(
                        ViolationKind::LcpNameCollision,
                        name,
                        format!(
                            "Loopback {} LCP name {} is not unique, also used by {}",
                            name,
                            lcp,
                            others.join(", ")
                        ),
                    );
                }
                _ => {}
            }

            if let Some(mac) = &lo.mac {
                if mac.is_multicast() {
                    report.push(
                        ViolationKind::LoopbackInvalid,
                        name,
                        format!("Loopback {} MAC address {} cannot be multicast", name, mac),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpcfg_types::{Config, Interface, Loopback, ValidationPolicy};

    fn run(config: &Config) -> ValidationReport {
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext::new(config, &policy);
        let mut report = ValidationReport::new();
        LoopbackRule::new().check(&ctx, &mut report);
        report
    }

    #[test]
    fn test_instance() {
        let rule = LoopbackRule::new();
        assert_eq!(rule.instance("loop0"), Some(0));
        assert_eq!(rule.instance("loop4095"), Some(4095));
        assert_eq!(rule.instance("loop4096"), None);
        assert_eq!(rule.instance("lo0"), None);
        assert_eq!(rule.instance("loop"), None);
    }

    #[test]
    fn test_address_without_lcp() {
        let mut config = Config::default();
        config.loopbacks.insert(
            "loop0".to_string(),
            Loopback {
                addresses: vec!["10.0.0.1/32".to_string()],
                ..Default::default()
            },
        );
        config.loopbacks.insert("loop1".to_string(), Loopback::default());
        let report = run(&config);

        assert_eq!(report.count(ViolationKind::LoopbackMissingLcp), 1);
        assert_eq!(report.violations().len(), 1);
        assert_eq!(report.violations()[0].subject, "loop0");
    }

    #[test]
    fn test_lcp_collision_and_mac() {
        let mut config = Config::default();
        config.interfaces.insert(
            "xe0".to_string(),
            Interface {
                lcp: Some("lo0".to_string()),
                ..Default::default()
            },
        );
        config.loopbacks.insert(
            "loop0".to_string(),
            Loopback {
                lcp: Some("lo0".to_string()),
                mac: Some("01:00:5e:00:00:01".parse().unwrap()),
                ..Default::default()
            },
        );
        let report = run(&config);

        assert_eq!(report.count(ViolationKind::LcpNameCollision), 1);
        assert_eq!(report.count(ViolationKind::LoopbackInvalid), 1);
        assert!(report.violations()[0].message.contains("interface xe0"));
    }
}
