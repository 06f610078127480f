//! CLI commands

pub mod show;
pub mod validate;

pub use show::{OutputFormat, ShowCommand};
pub use validate::{FileOutcome, ValidateCommand};
