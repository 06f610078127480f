//! Unnumbered interface and loopback checks

use dpcfg_core::UnnumberedError;
use dpcfg_types::AddressOwner;

use crate::report::{UnresolvedReason, ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

pub struct UnnumberedRule;

impl UnnumberedRule {
    pub fn new() -> Self {
        Self
    }

    fn check_one(
        &self,
        ctx: &ValidationContext<'_>,
        name: &str,
        owner: AddressOwner<'_>,
        report: &mut ValidationReport,
    ) {
        let Some(target) = owner.unnumbered() else {
            return;
        };
        log::debug!("checking unnumbered {} -> {}", name, target);
        let label = match owner {
            AddressOwner::Interface(_) => "Interface",
            AddressOwner::Loopback(_) => "Loopback",
        };

        if owner.has_addresses() {
            report.push(
                ViolationKind::UnnumberedConflict,
                name,
                format!("{} {} is unnumbered and cannot also have addresses", label, name),
            );
        }
        if ctx.registry.is_l2(target) {
            report.push(
                ViolationKind::UnnumberedConflict,
                name,
                format!(
                    "{} {} is unnumbered but target {} is in L2 mode",
                    label, name, target
                ),
            );
        }
        if let Err(err) = ctx.unnumbered().resolve(name) {
            let message = match &err {
                UnnumberedError::CycleDetected { chain } => format!(
                    "{} {} unnumbered chain {} loops back on itself",
                    label,
                    name,
                    chain.join(" -> ")
                ),
                other => format!("{} {} cannot borrow an address: {}", label, name, other),
            };
            report.push(
                ViolationKind::UnnumberedUnresolvable(UnresolvedReason::from(&err)),
                name,
                message,
            );
        }
    }
}

impl Default for UnnumberedRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for UnnumberedRule {
    fn name(&self) -> &str {
        "unnumbered"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        for (name, iface) in &ctx.config.interfaces {
            self.check_one(ctx, name, AddressOwner::Interface(iface), report);
        }
        for (name, lo) in &ctx.config.loopbacks {
            self.check_one(ctx, name, AddressOwner::Loopback(lo), report);
        }
    }
}
