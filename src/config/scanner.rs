//! Scanner configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::scanner::ScannerSettings;
use crate::domain::barcode::{BarcodeFormat, CandidateValidator, FormatAllowList, PRODUCT_CODE_LENGTHS};
use crate::domain::capture::{FacingMode, ProfileChain, ResolutionHint};

const MAX_FRAME_RATE: u32 = 240;

/// Capture and decode configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Camera the strict profile insists on
    #[serde(default)]
    pub facing: FacingMode,

    /// Preferred frame width (hint only)
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    /// Preferred frame height (hint only)
    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// Preferred frames per second (hint only)
    #[serde(default = "default_ideal_frame_rate")]
    pub ideal_frame_rate: u32,

    /// Symbologies passed to the decode engine (comma-separated in env)
    #[serde(default = "default_formats")]
    pub formats: Vec<BarcodeFormat>,

    /// Character counts a decoded candidate must have
    #[serde(default = "default_accepted_lengths")]
    pub accepted_lengths: Vec<usize>,

    /// Report per-frame decode failures to the listener
    #[serde(default)]
    pub surface_decode_errors: bool,

    /// Frames buffered between the device and the decode loop
    #[serde(default = "default_frame_buffer")]
    pub frame_buffer: usize,
}

impl ScannerConfig {
    /// Validate scanner configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.formats.is_empty() {
            return Err(ValidationError::NoFormats);
        }
        if self.accepted_lengths.is_empty() || self.accepted_lengths.contains(&0) {
            return Err(ValidationError::InvalidAcceptedLengths);
        }
        if self.ideal_width == 0 || self.ideal_height == 0 {
            return Err(ValidationError::InvalidResolution);
        }
        if self.ideal_frame_rate == 0 || self.ideal_frame_rate > MAX_FRAME_RATE {
            return Err(ValidationError::InvalidFrameRate);
        }
        if self.frame_buffer == 0 {
            return Err(ValidationError::InvalidFrameBuffer);
        }
        Ok(())
    }

    /// Builds the runtime settings handed to the scanner service.
    pub fn settings(&self) -> Result<ScannerSettings, ValidationError> {
        Ok(ScannerSettings {
            profiles: ProfileChain::standard(
                self.facing,
                ResolutionHint::new(self.ideal_width, self.ideal_height),
                self.ideal_frame_rate,
            ),
            formats: FormatAllowList::new(self.formats.iter().copied())?,
            validator: CandidateValidator::new(self.accepted_lengths.iter().copied())?,
            surface_decode_errors: self.surface_decode_errors,
        })
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            facing: FacingMode::default(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            ideal_frame_rate: default_ideal_frame_rate(),
            formats: default_formats(),
            accepted_lengths: default_accepted_lengths(),
            surface_decode_errors: false,
            frame_buffer: default_frame_buffer(),
        }
    }
}

fn default_ideal_width() -> u32 {
    1280
}

fn default_ideal_height() -> u32 {
    720
}

fn default_ideal_frame_rate() -> u32 {
    30
}

fn default_formats() -> Vec<BarcodeFormat> {
    BarcodeFormat::ALL.to_vec()
}

fn default_accepted_lengths() -> Vec<usize> {
    PRODUCT_CODE_LENGTHS.to_vec()
}

fn default_frame_buffer() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_config_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.facing, FacingMode::Environment);
        assert_eq!((config.ideal_width, config.ideal_height), (1280, 720));
        assert_eq!(config.ideal_frame_rate, 30);
        assert_eq!(config.formats.len(), 7);
        assert_eq!(config.accepted_lengths, vec![8, 12, 13]);
        assert!(!config.surface_decode_errors);
        assert_eq!(config.frame_buffer, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_settings_match_runtime_defaults() {
        let settings = ScannerConfig::default().settings().unwrap();
        assert_eq!(settings, ScannerSettings::default());
    }

    #[test]
    fn test_settings_use_configured_facing() {
        let config = ScannerConfig {
            facing: FacingMode::User,
            ..Default::default()
        };
        let settings = config.settings().unwrap();
        let strict = settings.profiles.iter().next().unwrap();
        assert_eq!(strict.facing().mode, FacingMode::User);
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let config = ScannerConfig {
            formats: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::NoFormats)));
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let config = ScannerConfig {
            accepted_lengths: vec![0, 13],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAcceptedLengths)
        ));
    }

    #[test]
    fn test_validate_rejects_zero_buffer_and_frame_rate() {
        let config = ScannerConfig {
            frame_buffer: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFrameBuffer)));

        let config = ScannerConfig {
            ideal_frame_rate: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFrameRate)));
    }

    #[test]
    fn test_scanner_config_deserialization() {
        let json = r#"{
            "facing": "user",
            "formats": ["ean13", "upc_a"],
            "accepted_lengths": [12, 13, 14],
            "surface_decode_errors": true
        }"#;

        let config: ScannerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.facing, FacingMode::User);
        assert_eq!(config.formats, vec![BarcodeFormat::Ean13, BarcodeFormat::UpcA]);
        assert_eq!(config.accepted_lengths, vec![12, 13, 14]);
        assert!(config.surface_decode_errors);
        assert_eq!(config.ideal_width, 1280);
    }
}
