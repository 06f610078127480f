//! 802.1Q / 802.1ad encapsulation handling
//!
//! A sub-interface without an explicit descriptor matches `dot1q <sub-id>`. A QinX
//! interface without one stacks its own sub-id as inner tag beneath the outer tag
//! of its QinX parent.

use serde::Serialize;

use dpcfg_types::{EncapsulationConfig, ValidationPolicy};

use crate::error::{CoreError, EncapsulationError};
use crate::hierarchy::Hierarchy;
use crate::ifname::InterfaceKind;
use crate::Result;

const VLAN_ID_MIN: u32 = 1;
const VLAN_ID_MAX: u32 = 4095;

/// Outer tag protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagProtocol {
    /// 802.1Q (C-TAG)
    Dot1q,
    /// 802.1ad (S-TAG)
    Dot1ad,
}

impl std::fmt::Display for TagProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagProtocol::Dot1q => write!(f, "dot1q"),
            TagProtocol::Dot1ad => write!(f, "dot1ad"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VlanTag {
    pub protocol: TagProtocol,
    pub id: u16,
}

impl std::fmt::Display for VlanTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.protocol, self.id)
    }
}

/// Canonical encapsulation descriptor. Two descriptors collide when all fields are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Encapsulation {
    pub outer: Option<VlanTag>,
    pub inner_dot1q: Option<u16>,
    pub exact_match: bool,
}

fn check_tag(field: &'static str, value: u32) -> std::result::Result<u16, EncapsulationError> {
    if (VLAN_ID_MIN..=VLAN_ID_MAX).contains(&value) {
        Ok(value as u16)
    } else {
        Err(EncapsulationError::TagOutOfRange { field, value })
    }
}

impl Encapsulation {
    pub fn dot1q(id: u16) -> Self {
        Self {
            outer: Some(VlanTag {
                protocol: TagProtocol::Dot1q,
                id,
            }),
            inner_dot1q: None,
            exact_match: false,
        }
    }

    /// Validate a descriptor as written and bring it into canonical form.
    pub fn parse(
        config: &EncapsulationConfig,
        policy: &ValidationPolicy,
    ) -> std::result::Result<Self, EncapsulationError> {
        let outer = match (config.dot1q, config.dot1ad) {
            (Some(_), Some(_)) => return Err(EncapsulationError::ConflictingOuterTags),
            (Some(id), None) => Some(VlanTag {
                protocol: TagProtocol::Dot1q,
                id: check_tag("dot1q", id.into())?,
            }),
            (None, Some(id)) => Some(VlanTag {
                protocol: TagProtocol::Dot1ad,
                id: check_tag("dot1ad", id.into())?,
            }),
            (None, None) => None,
        };

        let inner_dot1q = match config.inner_dot1q {
            Some(inner) => {
                let inner = check_tag("inner-dot1q", inner.into())?;
                if outer.is_none() {
                    return Err(EncapsulationError::InnerWithoutOuter { inner });
                }
                Some(inner)
            }
            None => None,
        };

        let exact_match = config.exact_match.unwrap_or(false);
        if exact_match && inner_dot1q.is_none() && policy.exact_match_requires_inner {
            return Err(EncapsulationError::ExactMatchWithoutInner);
        }

        Ok(Self {
            outer,
            inner_dot1q,
            exact_match,
        })
    }

    pub fn is_double_tagged(&self) -> bool {
        self.inner_dot1q.is_some()
    }
}

impl std::fmt::Display for Encapsulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outer {
            Some(outer) => write!(f, "{}", outer)?,
            None => write!(f, "untagged")?,
        }
        if let Some(inner) = self.inner_dot1q {
            write!(f, " inner-dot1q {}", inner)?;
        }
        if self.exact_match {
            write!(f, " exact-match")?;
        }
        Ok(())
    }
}

/// Encapsulation queries against one configuration
pub struct EncapsulationModel<'r, 'a> {
    hierarchy: &'r Hierarchy<'a>,
    policy: &'r ValidationPolicy,
}

impl<'r, 'a> EncapsulationModel<'r, 'a> {
    pub fn new(hierarchy: &'r Hierarchy<'a>, policy: &'r ValidationPolicy) -> Self {
        Self { hierarchy, policy }
    }

    /// Descriptor in effect for a sub-interface, defaults applied.
    pub fn effective(&self, name: &str) -> Result<Encapsulation> {
        let (name, iface) = self
            .hierarchy
            .get(name)
            .ok_or_else(|| CoreError::UnknownInterface {
                name: name.to_string(),
            })?;
        let parsed = self
            .hierarchy
            .parsed(name)
            .ok_or_else(|| CoreError::MalformedName {
                name: name.to_string(),
            })?;
        let kind = parsed.kind();
        if kind == InterfaceKind::Physical {
            return Err(CoreError::NotSubInterface {
                name: name.to_string(),
            });
        }

        let wrap = |source| CoreError::Encapsulation {
            name: name.to_string(),
            source,
        };

        if let Some(config) = &iface.encapsulation {
            return Encapsulation::parse(config, self.policy).map_err(wrap);
        }

        let sub_id = parsed.sub_id().unwrap_or_default();
        if kind == InterfaceKind::SubInterface {
            let id = check_tag("dot1q", sub_id).map_err(wrap)?;
            return Ok(Encapsulation::dot1q(id));
        }

        let (parent, _) = self.qinx_parent(name)?;
        let parent_encap = self.effective(parent).map_err(|_| {
            wrap(EncapsulationError::InvalidParent {
                parent: parent.to_string(),
            })
        })?;
        let inner = check_tag("inner-dot1q", sub_id).map_err(wrap)?;
        if parent_encap.outer.is_none() {
            return Err(wrap(EncapsulationError::InnerWithoutOuter { inner }));
        }
        Ok(Encapsulation {
            outer: parent_encap.outer,
            inner_dot1q: Some(inner),
            exact_match: false,
        })
    }

    fn qinx_parent(&self, name: &str) -> Result<(&'a str, &'a dpcfg_types::Interface)> {
        self.hierarchy.get_qinx_parent(name).ok_or_else(|| {
            let parent = self
                .hierarchy
                .parsed(name)
                .and_then(|parsed| parsed.qinx_parent_name())
                .unwrap_or_default();
            CoreError::MissingParent {
                name: name.to_string(),
                parent: parent.to_string(),
            }
        })
    }

    /// Full validity check; a QinX descriptor must stack cleanly beneath its parent.
    pub fn check(&self, name: &str) -> Result<Encapsulation> {
        let encap = self.effective(name)?;
        if self.hierarchy.classify(name) != Some(InterfaceKind::QinX) {
            return Ok(encap);
        }

        let wrap = |source| CoreError::Encapsulation {
            name: name.to_string(),
            source,
        };
        let (parent, _) = self.qinx_parent(name)?;
        let parent_encap = self.effective(parent).map_err(|_| {
            wrap(EncapsulationError::InvalidParent {
                parent: parent.to_string(),
            })
        })?;

        if parent_encap.is_double_tagged() {
            return Err(wrap(EncapsulationError::ParentDoubleTagged {
                parent: parent.to_string(),
            }));
        }
        if !encap.is_double_tagged() {
            return Err(wrap(EncapsulationError::MissingInnerTag));
        }
        if encap.outer != parent_encap.outer {
            let describe = |tag: Option<VlanTag>| match tag {
                Some(tag) => tag.to_string(),
                None => "untagged".to_string(),
            };
            return Err(wrap(EncapsulationError::OuterMismatch {
                outer: describe(encap.outer),
                parent: parent.to_string(),
                parent_outer: describe(parent_encap.outer),
            }));
        }
        Ok(encap)
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.check(name).is_ok()
    }

    /// Sub-interfaces on the same physical interface with an identical descriptor
    pub fn colliding_siblings(&self, name: &str) -> Vec<&'a str> {
        let Ok(encap) = self.effective(name) else {
            return Vec::new();
        };
        self.hierarchy
            .siblings(name)
            .into_iter()
            .filter(|sibling| self.effective(sibling).ok() == Some(encap))
            .collect()
    }

    /// False when the descriptor cannot be resolved or any sibling shares it
    pub fn is_unique_among_siblings(&self, name: &str) -> bool {
        self.effective(name).is_ok() && self.colliding_siblings(name).is_empty()
    }
}
