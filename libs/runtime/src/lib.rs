//! Process plumbing shared by the binaries: layered configuration and logging setup.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs};
pub use logging::{init_default_logging, init_logging_from_config};
