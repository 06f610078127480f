//! Layer-2 cross-connect checks

use indexmap::IndexSet;

use dpcfg_core::L2xcViolation;

use crate::report::{ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

pub struct L2xcRule;

impl L2xcRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for L2xcRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for L2xcRule {
    fn name(&self) -> &str {
        "l2xc"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        let violations = ctx.registry.l2xc_violations(ctx.policy.allow_reciprocal_l2xc);
        for violation in &violations {
            report.push(
                ViolationKind::L2xcInconsistent,
                violation.source(),
                violation.to_string(),
            );
        }

        // Members of a usable pair, each checked once
        let mut members = IndexSet::new();
        let mut pairs = Vec::new();
        for source in ctx.hierarchy.l2xc_interfaces() {
            let Some(target) = ctx.registry.l2xc_target(source) else {
                continue;
            };
            let unusable = violations.iter().any(|v| {
                v.source() == source
                    && matches!(
                        v,
                        L2xcViolation::MissingTarget { .. } | L2xcViolation::SelfTarget { .. }
                    )
            });
            if unusable {
                continue;
            }
            members.insert(source);
            members.insert(target);
            pairs.push((source, target));
        }

        for name in members {
            let Some((_, iface)) = ctx.hierarchy.get(name) else {
                continue;
            };
            log::debug!("checking l2xc member {}", name);
            if iface.has_addresses() {
                report.push(
                    ViolationKind::L2xcMember,
                    name,
                    format!("Interface {} is in L2XC so it cannot have an address", name),
                );
            }
            if iface.lcp.is_some() {
                report.push(
                    ViolationKind::L2xcMember,
                    name,
                    format!("Interface {} is in L2XC so it cannot have an LCP", name),
                );
            }
        }

        let attributes = ctx.attributes();
        for (source, target) in pairs {
            if let (Some(src_mtu), Some(dst_mtu)) = (attributes.mtu(source), attributes.mtu(target))
            {
                if src_mtu != dst_mtu {
                    report.push(
                        ViolationKind::L2xcMember,
                        source,
                        format!(
                            "Interface {} MTU {} does not match L2XC target {} MTU {}",
                            source, src_mtu, target, dst_mtu
                        ),
                    );
                }
            }
        }
    }
}
