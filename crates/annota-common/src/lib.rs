//! Common utilities for the annota workspace

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{AnnotaError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
