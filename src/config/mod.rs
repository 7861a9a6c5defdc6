//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BARCODE_CAPTURE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use barcode_capture::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let settings = config.scanner.settings().expect("Invalid scanner settings");
//! ```

mod error;
mod logging;
mod scanner;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use scanner::ScannerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Capture profiles, formats and validation
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BARCODE_CAPTURE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Splits list values on commas
    ///
    /// # Environment Variable Format
    ///
    /// - `BARCODE_CAPTURE__SCANNER__FACING=user` -> `scanner.facing = user`
    /// - `BARCODE_CAPTURE__SCANNER__FORMATS=ean13,upc_a` -> `scanner.formats = [ean13, upc_a]`
    /// - `BARCODE_CAPTURE__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BARCODE_CAPTURE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scanner.formats")
                    .with_list_parse_key("scanner.accepted_lengths"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scanner.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
