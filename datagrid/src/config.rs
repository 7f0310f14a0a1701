//! Table configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionMode;

/// Errors raised while validating or loading a [`TableConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The page size option list is empty.
    #[error("No page size options configured")]
    NoPageSizeOptions,

    /// One of the page size options is zero.
    #[error("Page size options must be greater than zero")]
    ZeroPageSize,

    /// The initial page size is not one of the options.
    #[error("Page size {size} is not one of the configured options {options:?}")]
    PageSizeNotAnOption { size: usize, options: Vec<usize> },

    /// Auto-refresh is enabled with a zero interval.
    #[error("Refresh interval must be greater than zero")]
    ZeroRefreshInterval,

    /// The config document could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Auto-refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Whether the refresh timer runs.
    ///
    /// Default: false
    pub enabled: bool,

    /// Seconds between refresh requests.
    ///
    /// Default: 30
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 30,
        }
    }
}

impl RefreshConfig {
    /// The refresh interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Configuration for a [`Table`](crate::Table).
///
/// # Example
///
/// ```
/// use datagrid::{SelectionMode, TableConfig};
///
/// let config = TableConfig::default()
///     .with_page_size_options(vec![5, 10, 25])
///     .with_page_size(5)
///     .with_selection(SelectionMode::Multi)
///     .with_auto_refresh(60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Page sizes the user can choose from.
    ///
    /// Default: 10, 20, 50, 100
    pub page_size_options: Vec<usize>,

    /// Initial page size. Must be one of `page_size_options`.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Row selection mode.
    ///
    /// Default: none
    pub selection: SelectionMode,

    /// Jump back to the first page whenever the filter text changes.
    /// When off, the page index is only clamped to the new page count.
    ///
    /// Default: false
    pub reset_page_on_filter: bool,

    /// Auto-refresh settings.
    pub refresh: RefreshConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size_options: vec![10, 20, 50, 100],
            page_size: 10,
            selection: SelectionMode::None,
            reset_page_on_filter: false,
            refresh: RefreshConfig::default(),
        }
    }
}

impl TableConfig {
    /// Parse a config from JSON and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size options.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Sets the initial page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the selection mode.
    pub fn with_selection(mut self, mode: SelectionMode) -> Self {
        self.selection = mode;
        self
    }

    /// Reset to the first page on every filter change.
    pub fn with_reset_page_on_filter(mut self, reset: bool) -> Self {
        self.reset_page_on_filter = reset;
        self
    }

    /// Enables auto-refresh every `interval_secs` seconds.
    pub fn with_auto_refresh(mut self, interval_secs: u64) -> Self {
        self.refresh = RefreshConfig {
            enabled: true,
            interval_secs,
        };
        self
    }

    /// Check the config for inconsistencies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizeOptions);
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.contains(&self.page_size) {
            return Err(ConfigError::PageSizeNotAnOption {
                size: self.page_size,
                options: self.page_size_options.clone(),
            });
        }
        if self.refresh.enabled && self.refresh.interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }
}
