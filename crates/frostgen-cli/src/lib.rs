//! # Frostgen CLI
//!
//! Loads the validator set parameters, runs key generation until an
//! acceptable group key comes out, prints the per-validator report and
//! writes the group descriptor.

pub mod config;
pub mod error;
pub mod persist;
pub mod report;

pub use config::{BridgeConfig, GeneratorConfig};
pub use error::{CliError, Result};
pub use persist::{read_group, write_group};
pub use report::{render_summary, render_validator, write_report};
