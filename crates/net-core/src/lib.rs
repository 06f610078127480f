//! dpcfg core engine
//!
//! Interface hierarchy resolution and the queries the validation rules are built on:
//! name parsing, parent lookup, inherited attributes, encapsulation and the
//! configuration-wide uniqueness registry.

pub mod attributes;
pub mod encapsulation;
pub mod error;
pub mod hierarchy;
pub mod ifname;
pub mod registry;
pub mod unnumbered;

pub use attributes::{AttributeResolver, Resolved, ValueSource};
pub use encapsulation::{Encapsulation, EncapsulationModel, TagProtocol, VlanTag};
pub use error::{CoreError, EncapsulationError, UnnumberedError};
pub use hierarchy::Hierarchy;
pub use ifname::{InterfaceKind, ParsedName};
pub use registry::{L2xcViolation, LcpOwner, Registry};
pub use unnumbered::{ResolvedAddressSource, UnnumberedResolver};

/// Result type for engine queries
pub type Result<T> = std::result::Result<T, CoreError>;
