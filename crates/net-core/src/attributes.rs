//! Inherited attribute resolution
//!
//! MTU, administrative state and MPLS are inherited from the parent when a
//! sub-interface does not set them, and fall back to a root default otherwise.

use serde::Serialize;

use dpcfg_types::{AdminState, Interface, ValidationPolicy};

use crate::hierarchy::Hierarchy;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "source", content = "from")]
pub enum ValueSource<'a> {
    Explicit,
    Inherited(&'a str),
    Default,
}

impl std::fmt::Display for ValueSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Explicit => write!(f, "explicit"),
            ValueSource::Inherited(parent) => write!(f, "inherited from {}", parent),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved<'a, T> {
    pub value: T,
    #[serde(flatten)]
    pub source: ValueSource<'a>,
}

/// Attribute resolver bound to one hierarchy
pub struct AttributeResolver<'r, 'a> {
    hierarchy: &'r Hierarchy<'a>,
    default_mtu: u32,
}

impl<'r, 'a> AttributeResolver<'r, 'a> {
    pub fn new(hierarchy: &'r Hierarchy<'a>, policy: &ValidationPolicy) -> Self {
        Self {
            hierarchy,
            default_mtu: policy.default_mtu,
        }
    }

    /// Walk from `name` towards the root and return the first explicit value.
    /// `None` when the interface itself does not exist.
    fn inherit<T: Copy>(
        &self,
        name: &str,
        attribute: &str,
        default: T,
        get: impl Fn(&Interface) -> Option<T>,
    ) -> Option<Resolved<'a, T>> {
        let (name, iface) = self.hierarchy.get(name)?;
        if let Some(value) = get(iface) {
            return Some(Resolved {
                value,
                source: ValueSource::Explicit,
            });
        }

        for (ancestor, parent) in self.hierarchy.ancestors(name) {
            if let Some(value) = get(parent) {
                return Some(Resolved {
                    value,
                    source: ValueSource::Inherited(ancestor),
                });
            }
        }

        log::debug!("interface {} has no {} set, using default", name, attribute);
        Some(Resolved {
            value: default,
            source: ValueSource::Default,
        })
    }

    pub fn resolve_mtu(&self, name: &str) -> Option<Resolved<'a, u32>> {
        self.inherit(name, "mtu", self.default_mtu, |iface| iface.mtu)
    }

    pub fn mtu(&self, name: &str) -> Option<u32> {
        self.resolve_mtu(name).map(|resolved| resolved.value)
    }

    /// Explicit or inherited administrative state, without the ancestor AND
    pub fn resolve_admin_state(&self, name: &str) -> Option<Resolved<'a, AdminState>> {
        self.inherit(name, "state", AdminState::Up, |iface| iface.state)
    }

    /// Administrative state after AND-ing the whole ancestor chain: a child is
    /// down when any configured ancestor is down, whatever it sets itself.
    /// A missing intermediate level does not hide the levels above it.
    pub fn effective_admin_state(&self, name: &str) -> Option<AdminState> {
        let (name, iface) = self.hierarchy.get(name)?;
        let own = iface.state.unwrap_or(AdminState::Up);
        let ancestors_up = self
            .hierarchy
            .lineage(name)
            .iter()
            .all(|(_, parent)| parent.state.unwrap_or(AdminState::Up).is_up());

        if own.is_up() && ancestors_up {
            Some(AdminState::Up)
        } else {
            Some(AdminState::Down)
        }
    }

    /// False for unknown interfaces
    pub fn is_admin_up(&self, name: &str) -> bool {
        self.effective_admin_state(name)
            .map(AdminState::is_up)
            .unwrap_or(false)
    }

    pub fn resolve_mpls(&self, name: &str) -> Option<Resolved<'a, bool>> {
        self.inherit(name, "mpls", false, |iface| iface.mpls)
    }

    /// False for unknown interfaces
    pub fn is_mpls(&self, name: &str) -> bool {
        self.resolve_mpls(name)
            .map(|resolved| resolved.value)
            .unwrap_or(false)
    }
}
