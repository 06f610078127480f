//! Address format and overlap checks across interfaces and loopbacks

use dpcfg_types::InterfaceAddress;

use crate::report::{ValidationReport, ViolationKind};
use crate::{Rule, ValidationContext};

pub struct AddressRule;

impl AddressRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AddressRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for AddressRule {
    fn name(&self) -> &str {
        "address"
    }

    fn check(&self, ctx: &ValidationContext<'_>, report: &mut ValidationReport) {
        let owners = ctx
            .config
            .interfaces
            .iter()
            .map(|(name, iface)| (name.as_str(), iface.addresses.as_slice()))
            .chain(
                ctx.config
                    .loopbacks
                    .iter()
                    .map(|(name, lo)| (name.as_str(), lo.addresses.as_slice())),
            );

        let mut used: Vec<(&str, InterfaceAddress)> = Vec::new();
        for (name, addresses) in owners {
            for raw in addresses {
                let addr = match raw.parse::<InterfaceAddress>() {
                    Ok(addr) => addr,
                    Err(err) => {
                        report.push(
                            ViolationKind::AddressInvalid,
                            name,
                            format!("{} address {} is invalid: {}", name, raw, err),
                        );
                        continue;
                    }
                };

                let canonical = addr.to_string();
                if canonical != *raw {
                    report.push(
                        ViolationKind::AddressInvalid,
                        name,
                        format!(
                            "{} address {} is not in canonical form {}",
                            name, raw, canonical
                        ),
                    );
                }

                if let Some((other, existing)) = used
                    .iter()
                    .find(|(other, existing)| *other != name && addr.same_network(existing))
                {
                    report.push(
                        ViolationKind::AddressConflict,
                        name,
                        format!(
                            "{} address {} conflicts with {} on {}",
                            name, addr, existing, other
                        ),
                    );
                }
                used.push((name, addr));
            }
        }
    }
}
