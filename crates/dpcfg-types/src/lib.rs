pub mod error;
pub mod network;
pub mod policy;

pub use error::{SharedResult, SharedTypeError};
pub use network::{
    AddressOwner, AdminState, Config, EncapsulationConfig, Interface, InterfaceAddress, Loopback,
    MacAddr,
};
pub use policy::{ValidationPolicy, DEFAULT_MTU};
