//! Utility modules for jobscript

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
