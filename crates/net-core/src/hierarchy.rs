//! Interface hierarchy navigation
//!
//! The hierarchy is derived from names: `xe0.100` is a child of `xe0`, and
//! `xe0.100.200` is a child of `xe0.100`. A [`Hierarchy`] parses every configured
//! name once and answers parent/child queries against the configuration.

use indexmap::IndexMap;

use dpcfg_types::{Config, Interface};

use crate::ifname::{self, InterfaceKind, ParsedName};

/// Read-only hierarchy view over one configuration, built once per validation run
pub struct Hierarchy<'a> {
    config: &'a Config,
    names: IndexMap<&'a str, ParsedName<'a>>,
}

impl<'a> Hierarchy<'a> {
    /// Parse and cache the name of every configured interface
    pub fn new(config: &'a Config) -> Self {
        let names = config
            .interfaces
            .keys()
            .filter_map(|name| ifname::parse(name).map(|parsed| (name.as_str(), parsed)))
            .collect();
        Self { config, names }
    }

    /// Cached components of a configured, well-formed interface name
    pub fn parsed(&self, name: &str) -> Option<&ParsedName<'a>> {
        self.names.get(name)
    }

    pub fn get(&self, name: &str) -> Option<(&'a str, &'a Interface)> {
        self.config
            .interfaces
            .get_key_value(name)
            .map(|(name, iface)| (name.as_str(), iface))
    }

    pub fn classify(&self, name: &str) -> Option<InterfaceKind> {
        match self.names.get(name) {
            Some(parsed) => Some(parsed.kind()),
            None => ifname::classify(name),
        }
    }

    /// Candidate parent name, whether or not the parent exists
    pub fn parent_name<'n>(&self, name: &'n str) -> Option<&'n str>
    where
        'a: 'n,
    {
        match self.names.get(name) {
            Some(parsed) => parsed.parent_name(),
            None => ifname::parent_name(name),
        }
    }

    /// The immediate parent, if the name has one and it is configured
    pub fn get_parent(&self, name: &str) -> Option<(&'a str, &'a Interface)> {
        let parent = self.parent_name(name)?;
        self.get(parent)
    }

    /// The one-level sub-interface above a QinX interface, if configured
    pub fn get_qinx_parent(&self, name: &str) -> Option<(&'a str, &'a Interface)> {
        let parent = match self.names.get(name) {
            Some(parsed) => parsed.qinx_parent_name()?,
            None => ifname::parse(name)?.qinx_parent_name()?,
        };
        let (parent, iface) = self.get(parent)?;
        if self.classify(parent) != Some(InterfaceKind::SubInterface) {
            return None;
        }
        Some((parent, iface))
    }

    /// Configured ancestors, nearest first. Stops at the first missing link.
    pub fn ancestors(&self, name: &str) -> Vec<(&'a str, &'a Interface)> {
        let mut chain = Vec::new();
        let mut current = self.get_parent(name);
        while let Some((parent, iface)) = current {
            chain.push((parent, iface));
            current = self.get_parent(parent);
        }
        chain
    }

    /// Configured interfaces on the name-derived path to the root, nearest first.
    /// Missing links are skipped rather than ending the walk.
    pub fn lineage(&self, name: &str) -> Vec<(&'a str, &'a Interface)> {
        let mut chain = Vec::new();
        let mut current = self.parent_name(name);
        while let Some(parent) = current {
            if let Some(found) = self.get(parent) {
                chain.push(found);
            }
            current = self.parent_name(parent);
        }
        chain
    }

    /// Physical base name of a well-formed name
    pub fn physical_name<'n>(&self, name: &'n str) -> Option<&'n str>
    where
        'a: 'n,
    {
        match self.names.get(name) {
            Some(parsed) => Some(parsed.base),
            None => ifname::parse(name).map(|parsed| parsed.base),
        }
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.names
            .values()
            .any(|parsed| parsed.parent_name() == Some(name))
    }

    pub fn is_phy(&self, name: &str) -> bool {
        self.get(name).is_some() && self.classify(name) == Some(InterfaceKind::Physical)
    }

    /// True for both single-tagged and QinX sub-interfaces
    pub fn is_sub(&self, name: &str) -> bool {
        self.get(name).is_some()
            && matches!(
                self.classify(name),
                Some(InterfaceKind::SubInterface | InterfaceKind::QinX)
            )
    }

    pub fn is_qinx(&self, name: &str) -> bool {
        self.get(name).is_some() && self.classify(name) == Some(InterfaceKind::QinX)
    }

    pub fn interfaces(&self) -> Vec<&'a str> {
        self.config.interfaces.keys().map(String::as_str).collect()
    }

    pub fn physical_interfaces(&self) -> Vec<&'a str> {
        self.filter_kind(|kind| kind == InterfaceKind::Physical)
    }

    /// All sub-interfaces, QinX included
    pub fn sub_interfaces(&self) -> Vec<&'a str> {
        self.filter_kind(|kind| kind != InterfaceKind::Physical)
    }

    pub fn qinx_interfaces(&self) -> Vec<&'a str> {
        self.filter_kind(|kind| kind == InterfaceKind::QinX)
    }

    /// Interfaces declaring a cross-connect
    pub fn l2xc_interfaces(&self) -> Vec<&'a str> {
        self.config
            .interfaces
            .iter()
            .filter(|(_, iface)| iface.l2xc.is_some())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Cross-connect targets in declaration order
    pub fn l2xc_targets(&self) -> Vec<&'a str> {
        self.config
            .interfaces
            .values()
            .filter_map(|iface| iface.l2xc.as_deref())
            .collect()
    }

    /// Sub-interfaces sharing the physical interface of `name`, excluding `name`
    pub fn siblings(&self, name: &str) -> Vec<&'a str> {
        let Some(base) = self.physical_name(name) else {
            return Vec::new();
        };
        self.names
            .iter()
            .filter(|(other, parsed)| {
                **other != name && parsed.base == base && parsed.kind() != InterfaceKind::Physical
            })
            .map(|(other, _)| *other)
            .collect()
    }

    fn filter_kind(&self, keep: impl Fn(InterfaceKind) -> bool) -> Vec<&'a str> {
        self.config
            .interfaces
            .keys()
            .filter(|name| self.names.get(name.as_str()).map(|p| keep(p.kind())) == Some(true))
            .map(String::as_str)
            .collect()
    }
}
