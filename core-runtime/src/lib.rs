//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the drive adapter crates:
//! - Logging and tracing infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

pub use config::{DriveConfig, DriveConfigBuilder};
pub use error::{Error, Result};
