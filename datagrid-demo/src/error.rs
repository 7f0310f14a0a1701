//! Demo error types

use datagrid::ConfigError;

/// Errors that stop the demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The inventory JSON is malformed.
    #[error("Inventory parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The table config is invalid.
    #[error("Invalid table config: {0}")]
    Config(#[from] ConfigError),

    /// The log file could not be set up.
    #[error("Logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}
