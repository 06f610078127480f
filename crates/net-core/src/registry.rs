//! Configuration-wide uniqueness relations
//!
//! The registry is built in one pass over interfaces and loopbacks and is then shared
//! by reference with every rule for the rest of the run.

use indexmap::IndexMap;
use serde::Serialize;

use dpcfg_types::Config;

/// Owner of an LCP name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "lowercase")]
pub enum LcpOwner<'a> {
    Interface(&'a str),
    Loopback(&'a str),
}

impl std::fmt::Display for LcpOwner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LcpOwner::Interface(name) => write!(f, "interface {}", name),
            LcpOwner::Loopback(name) => write!(f, "loopback {}", name),
        }
    }
}

/// Inconsistent cross-connect pairing, reported per source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L2xcViolation<'a> {
    MissingTarget { source: &'a str, target: &'a str },
    SelfTarget { source: &'a str },
    TargetIsSource { source: &'a str, target: &'a str },
    SharedTarget {
        source: &'a str,
        target: &'a str,
        others: Vec<&'a str>,
    },
}

impl<'a> L2xcViolation<'a> {
    pub fn source(&self) -> &'a str {
        match self {
            L2xcViolation::MissingTarget { source, .. }
            | L2xcViolation::SelfTarget { source }
            | L2xcViolation::TargetIsSource { source, .. }
            | L2xcViolation::SharedTarget { source, .. } => *source,
        }
    }
}

impl std::fmt::Display for L2xcViolation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            L2xcViolation::MissingTarget { source, target } => {
                write!(f, "Interface {} l2xc target {} does not exist", source, target)
            }
            L2xcViolation::SelfTarget { source } => {
                write!(f, "Interface {} cannot cross-connect to itself", source)
            }
            L2xcViolation::TargetIsSource { source, target } => write!(
                f,
                "Interface {} l2xc target {} is itself an l2xc source",
                source, target
            ),
            L2xcViolation::SharedTarget {
                source,
                target,
                others,
            } => write!(
                f,
                "Interface {} l2xc target {} is also claimed by {}",
                source,
                target,
                others.join(", ")
            ),
        }
    }
}

/// LCP name and cross-connect relations for one configuration
#[derive(Debug)]
pub struct Registry<'a> {
    config: &'a Config,
    lcps: IndexMap<&'a str, Vec<LcpOwner<'a>>>,
    l2xc: IndexMap<&'a str, &'a str>,
    l2xc_claims: IndexMap<&'a str, Vec<&'a str>>,
}

impl<'a> Registry<'a> {
    pub fn build(config: &'a Config) -> Self {
        let mut lcps: IndexMap<&'a str, Vec<LcpOwner<'a>>> = IndexMap::new();
        let mut l2xc = IndexMap::new();
        let mut l2xc_claims: IndexMap<&'a str, Vec<&'a str>> = IndexMap::new();

        for (name, iface) in &config.interfaces {
            if let Some(lcp) = iface.lcp.as_deref() {
                lcps.entry(lcp)
                    .or_default()
                    .push(LcpOwner::Interface(name));
            }
            if let Some(target) = iface.l2xc.as_deref() {
                l2xc.insert(name.as_str(), target);
                l2xc_claims.entry(target).or_default().push(name.as_str());
            }
        }
        for (name, lo) in &config.loopbacks {
            if let Some(lcp) = lo.lcp.as_deref() {
                lcps.entry(lcp).or_default().push(LcpOwner::Loopback(name));
            }
        }

        log::debug!(
            "registry built: {} lcp names, {} cross-connects",
            lcps.len(),
            l2xc.len()
        );
        Self {
            config,
            lcps,
            l2xc,
            l2xc_claims,
        }
    }

    /// True iff exactly one interface or loopback uses `lcp`
    pub fn lcp_is_unique(&self, lcp: &str) -> bool {
        self.lcp_owners(lcp).len() == 1
    }

    pub fn lcp_owners(&self, lcp: &str) -> &[LcpOwner<'a>] {
        self.lcps.get(lcp).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The single owner of `lcp`, `None` when unused or shared
    pub fn lcp_owner(&self, lcp: &str) -> Option<LcpOwner<'a>> {
        match self.lcp_owners(lcp) {
            [owner] => Some(*owner),
            _ => None,
        }
    }

    /// LCP names with more than one owner, in first-use order
    pub fn lcp_collisions(&self) -> impl Iterator<Item = (&'a str, &[LcpOwner<'a>])> {
        self.lcps
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(lcp, owners)| (*lcp, owners.as_slice()))
    }

    pub fn l2xc_target(&self, source: &str) -> Option<&'a str> {
        self.l2xc.get(source).copied()
    }

    pub fn is_l2xc_source(&self, name: &str) -> bool {
        self.l2xc.contains_key(name)
    }

    pub fn is_l2xc_target(&self, name: &str) -> bool {
        self.l2xc_claims.contains_key(name)
    }

    /// Layer-2 only: no addresses of its own and part of a cross-connect
    pub fn is_l2(&self, name: &str) -> bool {
        let Some(iface) = self.config.interface(name) else {
            return false;
        };
        !iface.has_addresses() && (self.is_l2xc_source(name) || self.is_l2xc_target(name))
    }

    fn is_reciprocal(&self, source: &str, target: &str) -> bool {
        self.l2xc_target(target) == Some(source)
    }

    /// Every inconsistent pairing, in source declaration order
    pub fn l2xc_violations(&self, allow_reciprocal: bool) -> Vec<L2xcViolation<'a>> {
        let mut violations = Vec::new();
        for (&source, &target) in &self.l2xc {
            if source == target {
                violations.push(L2xcViolation::SelfTarget { source });
                continue;
            }
            if self.config.interface(target).is_none() {
                violations.push(L2xcViolation::MissingTarget { source, target });
                continue;
            }
            let reciprocal = allow_reciprocal && self.is_reciprocal(source, target);
            if self.is_l2xc_source(target) && !reciprocal {
                violations.push(L2xcViolation::TargetIsSource { source, target });
            }
            let others: Vec<&'a str> = self
                .l2xc_claims
                .get(target)
                .into_iter()
                .flatten()
                .copied()
                .filter(|other| *other != source)
                .collect();
            if !others.is_empty() {
                violations.push(L2xcViolation::SharedTarget {
                    source,
                    target,
                    others,
                });
            }
        }
        violations
    }
}
