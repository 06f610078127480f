//! Unnumbered address borrowing
//!
//! An unnumbered interface or loopback has no address of its own and borrows the
//! addresses of a named target. Targets may be unnumbered in turn.

use indexmap::IndexSet;
use serde::Serialize;

use dpcfg_types::Config;

use crate::error::UnnumberedError;

/// The address-bearing entity an unnumbered chain ends at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddressSource<'a> {
    pub name: &'a str,
    pub addresses: &'a [String],
    /// Borrowing steps taken, 1 for a direct reference
    pub hops: usize,
}

pub struct UnnumberedResolver<'a> {
    config: &'a Config,
}

impl<'a> UnnumberedResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// True when `name` declares a target, whether or not it resolves
    pub fn is_unnumbered(&self, name: &str) -> bool {
        self.target(name).is_some()
    }

    pub fn target(&self, name: &str) -> Option<&'a str> {
        self.config
            .address_owner(name)
            .and_then(|owner| owner.unnumbered())
    }

    /// Follow the borrowing chain from `name` to an entity with addresses.
    pub fn resolve(&self, name: &str) -> Result<ResolvedAddressSource<'a>, UnnumberedError> {
        let mut visiting: IndexSet<&str> = IndexSet::new();
        let mut current = name;

        loop {
            visiting.insert(current);
            let target = match self.target(current) {
                Some(target) => target,
                // Only reachable for the starting entity
                None => {
                    return Err(UnnumberedError::NotUnnumbered {
                        name: name.to_string(),
                    })
                }
            };
            log::debug!("{} borrows its address from {}", current, target);

            if visiting.contains(target) {
                let mut chain: Vec<String> = visiting.iter().map(|s| s.to_string()).collect();
                chain.push(target.to_string());
                return Err(UnnumberedError::CycleDetected { chain });
            }

            let owner = self.config.address_owner(target).ok_or_else(|| {
                UnnumberedError::DanglingReference {
                    name: current.to_string(),
                    target: target.to_string(),
                }
            })?;

            if owner.has_addresses() {
                return Ok(ResolvedAddressSource {
                    name: target,
                    addresses: owner.addresses(),
                    hops: visiting.len(),
                });
            }
            if owner.unnumbered().is_none() {
                return Err(UnnumberedError::NoAddressAvailable {
                    name: current.to_string(),
                    target: target.to_string(),
                });
            }
            current = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpcfg_types::{Interface, Loopback};

    fn iface(addresses: &[&str], unnumbered: Option<&str>) -> Interface {
        Interface {
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            unnumbered: unnumbered.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample() -> Config {
        let mut config = Config::default();
        let entries = [
            ("xe0", iface(&["192.0.2.1/24"], None)),
            ("xe1", iface(&[], Some("xe0"))),
            ("xe2", iface(&[], Some("xe1"))),
            ("xe3", iface(&[], Some("xe9"))),
            ("xe4", iface(&[], Some("xe5"))),
            ("xe5", iface(&[], Some("xe4"))),
            ("xe6", iface(&[], Some("xe6"))),
            ("xe7", iface(&[], None)),
            ("xe8", iface(&[], Some("xe7"))),
            ("xe10", iface(&[], Some("loop0"))),
        ];
        for (name, iface) in entries {
            config.interfaces.insert(name.to_string(), iface);
        }
        config.loopbacks.insert(
            "loop0".to_string(),
            Loopback {
                addresses: vec!["10.0.0.1/32".to_string()],
                ..Default::default()
            },
        );
        config
    }

    #[test]
    fn test_is_unnumbered() {
        let config = sample();
        let resolver = UnnumberedResolver::new(&config);

        assert!(resolver.is_unnumbered("xe1"));
        // Declared, even though it never resolves
        assert!(resolver.is_unnumbered("xe3"));
        assert!(!resolver.is_unnumbered("xe0"));
        assert!(!resolver.is_unnumbered("missing"));
    }

    #[test]
    fn test_resolve_direct_and_chained() {
        let config = sample();
        let resolver = UnnumberedResolver::new(&config);

        let direct = resolver.resolve("xe1").unwrap();
        assert_eq!(direct.name, "xe0");
        assert_eq!(direct.hops, 1);

        let chained = resolver.resolve("xe2").unwrap();
        assert_eq!(chained.name, "xe0");
        assert_eq!(chained.hops, 2);
        assert_eq!(chained.addresses, &["192.0.2.1/24".to_string()]);

        assert_eq!(resolver.resolve("xe10").unwrap().name, "loop0");
    }

    #[test]
    fn test_resolve_failures() {
        let config = sample();
        let resolver = UnnumberedResolver::new(&config);

        assert_eq!(
            resolver.resolve("xe3"),
            Err(UnnumberedError::DanglingReference {
                name: "xe3".to_string(),
                target: "xe9".to_string()
            })
        );
        assert_eq!(
            resolver.resolve("xe8"),
            Err(UnnumberedError::NoAddressAvailable {
                name: "xe8".to_string(),
                target: "xe7".to_string()
            })
        );
        assert_eq!(
            resolver.resolve("xe0"),
            Err(UnnumberedError::NotUnnumbered {
                name: "xe0".to_string()
            })
        );
    }

    #[test]
    fn test_cycles_are_detected() {
        let config = sample();
        let resolver = UnnumberedResolver::new(&config);

        assert_eq!(
            resolver.resolve("xe4"),
            Err(UnnumberedError::CycleDetected {
                chain: vec!["xe4".to_string(), "xe5".to_string(), "xe4".to_string()]
            })
        );
        assert!(matches!(
            resolver.resolve("xe5"),
            Err(UnnumberedError::CycleDetected { .. })
        ));
        assert!(matches!(
            resolver.resolve("xe6"),
            Err(UnnumberedError::CycleDetected { .. })
        ));
    }
}
