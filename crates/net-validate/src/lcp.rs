//! Linux control plane name checks

use regex::Regex;

use dpcfg_core::{InterfaceKind, LcpOwner};

use crate::report::{ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

/// Linux limits interface names to IFNAMSIZ - 1 bytes
const LCP_NAME_MAX: usize = 15;

pub struct LcpRule {
    name_regex: Regex,
}

impl LcpRule {
    pub fn new() -> Self {
        Self {
            name_regex: Regex::new(r"^[a-z]+[a-z0-9-]*$").expect("LCP name pattern compiles"),
        }
    }

    pub fn is_valid_name(&self, lcp: &str) -> bool {
        lcp.len() <= LCP_NAME_MAX && self.name_regex.is_match(lcp)
    }

    fn check_placement<'a>(
        &self,
        ctx: &ValidationContext<'a>,
        name: &'a str,
        report: &mut ValidationReport,
    ) {
        let kind = ctx.hierarchy.classify(name);
        if !matches!(
            kind,
            Some(InterfaceKind::SubInterface | InterfaceKind::QinX)
        ) {
            return;
        }

        if let Some((parent, parent_iface)) = ctx.hierarchy.get_parent(name) {
            if parent_iface.lcp.is_none() {
                report.push(
                    ViolationKind::LcpRequirement,
                    name,
                    format!(
                        "Sub-interface {} has an LCP but its parent {} does not",
                        name, parent
                    ),
                );
            }
        }
        if kind == Some(InterfaceKind::QinX) {
            if let Some((qinx_parent, qinx_iface)) = ctx.hierarchy.get_qinx_parent(name) {
                let immediate = ctx.hierarchy.parent_name(name);
                if immediate != Some(qinx_parent) && qinx_iface.lcp.is_none() {
                    report.push(
                        ViolationKind::LcpRequirement,
                        name,
                        format!(
                            "QinX interface {} has an LCP but its QinX parent {} does not",
                            name, qinx_parent
                        ),
                    );
                }
            }
        }

        if let Ok(encap) = ctx.encapsulation().effective(name) {
            if !encap.exact_match {
                report.push(
                    ViolationKind::LcpRequirement,
                    name,
                    format!(
                        "Sub-interface {} has an LCP but its encapsulation is not exact-match",
                        name
                    ),
                );
            }
        }
    }
}

impl Default for LcpRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LcpRule {
    fn name(&self) -> &str {
        "lcp"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        for (name, iface) in &ctx.config.interfaces {
            let Some(lcp) = iface.lcp.as_deref() else {
                continue;
            };
            log::debug!("checking LCP {} of interface {}", lcp, name);

            if !self.is_valid_name(lcp) {
                report.push(
                    ViolationKind::LcpInvalidName,
                    name,
                    format!("Interface {} LCP name {} is not a valid Linux interface name", name, lcp),
                );
            }
            if !ctx.registry.lcp_is_unique(lcp) {
                let others: Vec<String> = ctx
                    .registry
                    .lcp_owners(lcp)
                    .iter()
                    .filter(|owner| **owner != LcpOwner::Interface(name))
                    .map(|owner| owner.to_string())
                    .collect();
                report.push(
                    ViolationKind::LcpNameCollision,
                    name,
                    format!(
                        "Interface {} LCP name {} is not unique, also used by {}",
                        name,
                        lcp,
                        others.join(", ")
                    ),
                );
            }
            self.check_placement(ctx, name, report);
        }

        for (name, lo) in &ctx.config.loopbacks {
            if let Some(lcp) = lo.lcp.as_deref() {
                if !self.is_valid_name(lcp) {
                    report.push(
                        ViolationKind::LcpInvalidName,
                        name,
                        format!(
                            "Loopback {} LCP name {} is not a valid Linux interface name",
                            name, lcp
                        ),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpcfg_types::{Config, EncapsulationConfig, Interface, Loopback, ValidationPolicy};

    fn run(config: &Config) -> ValidationReport {
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext::new(config, &policy);
        let mut report = ValidationReport::new();
        LcpRule::new().check(&ctx, &mut report);
        report
    }

    fn with_lcp(lcp: &str) -> Interface {
        Interface {
            lcp: Some(lcp.to_string()),
            ..Default::default()
        }
    }

    fn exact(dot1q: u16) -> Option<EncapsulationConfig> {
        Some(EncapsulationConfig {
            dot1q: Some(dot1q),
            exact_match: Some(true),
            ..Default::default()
        })
    }

    #[test]
    fn test_name_format() {
        let rule = LcpRule::new();
        assert!(rule.is_valid_name("e0"));
        assert!(rule.is_valid_name("ice0-1"));
        assert!(!rule.is_valid_name("0e"));
        assert!(!rule.is_valid_name("E0"));
        assert!(!rule.is_valid_name("e0.100"));
        assert!(!rule.is_valid_name("abcdefghijklmnop"));
    }

    #[test]
    fn test_collision_with_loopback_reported_for_interface() {
        let mut config = Config::default();
        config.interfaces.insert("xe0".to_string(), with_lcp("e0"));
        config.loopbacks.insert(
            "loop0".to_string(),
            Loopback {
                lcp: Some("e0".to_string()),
                ..Default::default()
            },
        );
        let report = run(&config);

        assert_eq!(report.count(ViolationKind::LcpNameCollision), 1);
        assert!(report.violations()[0].message.contains("loopback loop0"));
    }

    #[test]
    fn test_sub_lcp_requirements() {
        let mut config = Config::default();
        config.interfaces.insert("xe0".to_string(), Interface::default());
        config.interfaces.insert(
            "xe0.100".to_string(),
            Interface {
                encapsulation: exact(100),
                ..with_lcp("e0-100")
            },
        );
        config.interfaces.insert("xe1".to_string(), with_lcp("e1"));
        config.interfaces.insert("xe1.100".to_string(), with_lcp("e1-100"));
        config.interfaces.insert(
            "xe1.200".to_string(),
            Interface {
                encapsulation: exact(200),
                ..with_lcp("e1-200")
            },
        );
        let report = run(&config);

        let subjects: Vec<&str> = report
            .violations()
            .iter()
            .map(|v| v.subject.as_str())
            .collect();
        // xe0 has no LCP; xe1.100 defaults to a non exact-match encapsulation
        assert_eq!(subjects, vec!["xe0.100", "xe1.100"]);
        assert_eq!(report.count(ViolationKind::LcpRequirement), 2);
    }

    fn requirement_messages<'r>(report: &'r ValidationReport, subject: &'r str) -> Vec<&'r str> {
        report
            .for_subject(subject)
            .filter(|v| v.kind == ViolationKind::LcpRequirement)
            .map(|v| v.message.as_str())
            .collect()
    }

    #[test]
    fn test_qinx_parent_without_lcp() {
        let mut config = Config::default();
        config.interfaces.insert("xe0".to_string(), with_lcp("e0"));
        config.interfaces.insert("xe0.100".to_string(), Interface::default());
        config
            .interfaces
            .insert("xe0.100.200".to_string(), with_lcp("e0-100-200"));
        config
            .interfaces
            .insert("xe0.100.200.300".to_string(), with_lcp("e0-100-200-3"));
        let report = run(&config);

        // Immediate parent has an LCP, so only the QinX parent is named
        let deep: Vec<&str> = requirement_messages(&report, "xe0.100.200.300")
            .into_iter()
            .filter(|m| m.contains("QinX parent"))
            .collect();
        assert_eq!(deep.len(), 1);
        assert!(deep[0].contains("QinX parent xe0.100 does not"));
        assert!(!requirement_messages(&report, "xe0.100.200.300")
            .iter()
            .any(|m| m.contains("its parent")));

        // At depth two the QinX parent is the immediate parent: one diagnostic, not two
        let shallow: Vec<&str> = requirement_messages(&report, "xe0.100.200")
            .into_iter()
            .filter(|m| m.contains("parent"))
            .collect();
        assert_eq!(
            shallow,
            vec!["Sub-interface xe0.100.200 has an LCP but its parent xe0.100 does not"]
        );
    }
}
