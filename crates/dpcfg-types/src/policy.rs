use serde::{Deserialize, Serialize};

/// Platform MTU used when neither an interface nor any ancestor sets one.
pub const DEFAULT_MTU: u32 = 1500;

/// Tunable interpretation choices for the validation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// MTU applied at the root of a hierarchy when nothing sets one.
    pub default_mtu: u32,
    /// Reject `exact-match` on a descriptor that carries no inner tag.
    pub exact_match_requires_inner: bool,
    /// Accept `A -> B, B -> A` as one bidirectional cross-connect.
    pub allow_reciprocal_l2xc: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            default_mtu: DEFAULT_MTU,
            exact_match_requires_inner: false,
            allow_reciprocal_l2xc: false,
        }
    }
}
