//! Error types for engine queries

use thiserror::Error;

/// Main error type for hierarchy, attribute and encapsulation queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("interface {name} does not exist")]
    UnknownInterface { name: String },

    #[error("interface name {name} is malformed")]
    MalformedName { name: String },

    #[error("interface {name} is not a sub-interface")]
    NotSubInterface { name: String },

    #[error("sub-interface {name} parent {parent} does not exist")]
    MissingParent { name: String, parent: String },

    #[error("sub-interface {name} has invalid encapsulation: {source}")]
    Encapsulation {
        name: String,
        #[source]
        source: EncapsulationError,
    },
}

/// Encapsulation descriptor errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncapsulationError {
    #[error("dot1q and dot1ad are mutually exclusive")]
    ConflictingOuterTags,

    #[error("inner-dot1q {inner} requires an outer dot1q or dot1ad tag")]
    InnerWithoutOuter { inner: u16 },

    #[error("exact-match requires an inner-dot1q tag")]
    ExactMatchWithoutInner,

    #[error("{field} {value} is out of range 1-4095")]
    TagOutOfRange { field: &'static str, value: u32 },

    #[error("QinX encapsulation must set inner-dot1q")]
    MissingInnerTag,

    #[error("outer tag {outer} does not match QinX parent {parent} outer tag {parent_outer}")]
    OuterMismatch {
        outer: String,
        parent: String,
        parent_outer: String,
    },

    #[error("QinX parent {parent} is itself double-tagged")]
    ParentDoubleTagged { parent: String },

    #[error("QinX parent {parent} has invalid encapsulation")]
    InvalidParent { parent: String },
}

/// Unnumbered address resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnnumberedError {
    #[error("{name} is not unnumbered")]
    NotUnnumbered { name: String },

    #[error("{name} unnumbered target {target} does not exist")]
    DanglingReference { name: String, target: String },

    #[error("unnumbered chain {} loops back on itself", .chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    #[error("{name} unnumbered target {target} has no address to borrow")]
    NoAddressAvailable { name: String, target: String },
}
