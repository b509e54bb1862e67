//! Configuration Module
//! Command-line flags with environment fallbacks.

use clap::Parser;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("Timeout must be at least one second")]
    ZeroTimeout,
    #[error("Size must be non-zero, got {0}x{1}")]
    ZeroSize(u32, u32),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "market_dash", version, about = "Market & strategy dashboard")]
pub struct Settings {
    /// Backend root URL
    #[arg(long, env = "MARKET_DASH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "MARKET_DASH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Window width
    #[arg(long, default_value_t = 1400.0)]
    pub width: f32,

    /// Window height
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,

    /// Exported chart width in pixels
    #[arg(long, default_value_t = 1200)]
    pub export_width: u32,

    /// Exported chart height in pixels
    #[arg(long, default_value_t = 600)]
    pub export_height: u32,

    /// Draw the built-in sample series on startup
    #[arg(long)]
    pub sample_chart: bool,
}

impl Settings {
    /// Parse the process arguments and validate them.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::parse();
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(ConfigError::ZeroSize(self.export_width, self.export_height));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
