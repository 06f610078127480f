//! dpcfg configuration loading
//!
//! Reads interface configuration documents (YAML or JSON) into the typed model and
//! assembles the validation policy from defaults, a settings file and the environment.

pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::{load_file, load_str, Format};
pub use settings::{load_policy, ENV_PREFIX};

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, ConfigError>;
