//! Logging setup.
//!
//! Code logs through the `log` facade; applications call [`init_logging`]
//! once to install an `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
