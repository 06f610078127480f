//! Per-interface structure checks: naming, parent existence, encapsulation, MTU

use dpcfg_core::{CoreError, InterfaceKind};

use crate::report::{ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

pub struct InterfaceRule;

impl InterfaceRule {
    pub fn new() -> Self {
        Self
    }

    fn check_physical(&self, ctx: &ValidationContext<'_>, name: &str, report: &mut ValidationReport) {
        let Some((_, iface)) = ctx.hierarchy.get(name) else {
            return;
        };
        if iface.encapsulation.is_some() {
            report.push(
                ViolationKind::EncapsulationMalformed,
                name,
                format!("Interface {} is physical and cannot have an encapsulation", name),
            );
        }
    }

    fn check_sub(&self, ctx: &ValidationContext<'_>, name: &str, report: &mut ValidationReport) {
        let Some((parent, _)) = ctx.hierarchy.get_parent(name) else {
            let parent = ctx.hierarchy.parent_name(name).unwrap_or_default();
            report.push(
                ViolationKind::SchemaAssumptionViolated,
                name,
                format!("Sub-interface {} parent {} does not exist", name, parent),
            );
            return;
        };

        let model = ctx.encapsulation();
        match model.check(name) {
            Ok(encap) => {
                let collisions = model.colliding_siblings(name);
                if !collisions.is_empty() {
                    report.push(
                        ViolationKind::EncapsulationCollision,
                        name,
                        format!(
                            "Sub-interface {} encapsulation {} is not unique, also used by {}",
                            name,
                            encap,
                            collisions.join(", ")
                        ),
                    );
                }
            }
            Err(CoreError::Encapsulation { source, .. }) => {
                report.push(
                    ViolationKind::EncapsulationMalformed,
                    name,
                    format!("Sub-interface {} has invalid encapsulation: {}", name, source),
                );
            }
            Err(err) => {
                report.push(
                    ViolationKind::EncapsulationMalformed,
                    name,
                    format!("Sub-interface {} encapsulation cannot be resolved: {}", name, err),
                );
            }
        }

        let attributes = ctx.attributes();
        if let (Some(mtu), Some(parent_mtu)) = (attributes.mtu(name), attributes.mtu(parent)) {
            if mtu > parent_mtu {
                report.push(
                    ViolationKind::MtuExceedsParent,
                    name,
                    format!(
                        "Sub-interface {} has MTU {} higher than parent {} MTU {}",
                        name, mtu, parent, parent_mtu
                    ),
                );
            }
        }
    }
}

impl Default for InterfaceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for InterfaceRule {
    fn name(&self) -> &str {
        "interface"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        for name in ctx.hierarchy.interfaces() {
            log::debug!("checking interface {}", name);
            match ctx.hierarchy.classify(name) {
                None => report.push(
                    ViolationKind::MalformedName,
                    name,
                    format!("Interface name {} is malformed", name),
                ),
                Some(InterfaceKind::Physical) => self.check_physical(ctx, name, report),
                Some(InterfaceKind::SubInterface | InterfaceKind::QinX) => {
                    self.check_sub(ctx, name, report)
                }
            }

            let Some((_, iface)) = ctx.hierarchy.get(name) else {
                continue;
            };
            if iface.has_addresses() && iface.lcp.is_none() {
                report.push(
                    ViolationKind::MissingLcp,
                    name,
                    format!("Interface {} has an address but no LCP", name),
                );
            }
        }
    }
}
