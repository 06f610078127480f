//! dpcfg command line
//!
//! Thin driver around the validation engine: loads configuration files, builds the
//! validation policy and reports results.

pub mod commands;

use dpcfg_types::ValidationPolicy;

/// Policy settings given on the command line; applied after file and environment layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOverrides {
    pub default_mtu: Option<u32>,
    pub exact_match_requires_inner: bool,
    pub allow_reciprocal_l2xc: bool,
}

impl PolicyOverrides {
    pub fn apply(&self, mut policy: ValidationPolicy) -> ValidationPolicy {
        if let Some(mtu) = self.default_mtu {
            policy.default_mtu = mtu;
        }
        if self.exact_match_requires_inner {
            policy.exact_match_requires_inner = true;
        }
        if self.allow_reciprocal_l2xc {
            policy.allow_reciprocal_l2xc = true;
        }
        policy
    }
}
