use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Environment variable that overrides `page_size`.
pub const PAGE_SIZE_ENV: &str = "PAGING_PAGE_SIZE";

/// Errors raised while loading or validating paging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Pages must hold at least one row.
    #[error("Invalid page size: {0} (must be greater than zero)")]
    InvalidPageSize(usize),

    /// The configuration document could not be parsed.
    #[error("Failed to parse paging config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An override variable held something other than a number.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PagingConfig {
    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PagingConfig {
    pub fn new(page_size: usize) -> Self {
        PagingConfig { page_size }
    }

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: PagingConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using `lookup` to resolve variable names.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PAGE_SIZE_ENV) {
            self.page_size = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: PAGE_SIZE_ENV,
                    value: raw.clone(),
                })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }
}
