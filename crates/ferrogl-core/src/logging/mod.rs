//! Logger initialization.
//!
//! The crate logs through the `log` facade only. Binaries and tests that want
//! to see lifecycle and driver records install `env_logger` through here.

mod init;

pub use init::{LoggingConfig, init_logging};
