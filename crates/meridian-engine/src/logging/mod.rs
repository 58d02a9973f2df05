//! Logger setup for binaries and tests.
//!
//! Library code logs through the `log` macros only; `init_logging` picks the
//! backend.

mod init;

pub use init::{init_logging, LoggingConfig};
