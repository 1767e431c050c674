//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{BitRate, DEFAULT_BIT_RATE_BPS};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory segments are written to
    pub output_dir: Option<String>,
    /// Encoding bit rate in bits per second
    pub bit_rate: Option<u32>,
    /// Auto-save rotation interval in minutes (0 disables rotation)
    pub auto_save_interval_minutes: Option<u32>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            output_dir: None,
            bit_rate: Some(DEFAULT_BIT_RATE_BPS),
            auto_save_interval_minutes: Some(0),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output_dir: other.output_dir.or(self.output_dir),
            bit_rate: other.bit_rate.or(self.bit_rate),
            auto_save_interval_minutes: other
                .auto_save_interval_minutes
                .or(self.auto_save_interval_minutes),
        }
    }

    /// Get the output directory, or the app cache directory if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_output_dir)
    }

    /// Get the bit rate, or 128 kbps if not set
    pub fn bit_rate_or_default(&self) -> BitRate {
        BitRate::from_bps(self.bit_rate.unwrap_or(DEFAULT_BIT_RATE_BPS))
    }

    /// Get the auto-save interval in minutes, or 0 (disabled) if not set
    pub fn auto_save_interval_or_default(&self) -> u32 {
        self.auto_save_interval_minutes.unwrap_or(0)
    }
}

/// Default segment output directory: the app-private cache directory.
fn default_output_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("micseg")
        .join("recordings")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.output_dir.is_none());
        assert_eq!(config.bit_rate, Some(128_000));
        assert_eq!(config.auto_save_interval_minutes, Some(0));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.output_dir.is_none());
        assert!(config.bit_rate.is_none());
        assert!(config.auto_save_interval_minutes.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            output_dir: Some("/base".to_string()),
            bit_rate: Some(64_000),
            ..Default::default()
        };

        let other = AppConfig {
            output_dir: Some("/other".to_string()),
            bit_rate: None, // Should not override
            auto_save_interval_minutes: Some(5),
        };

        let merged = base.merge(other);

        assert_eq!(merged.output_dir, Some("/other".to_string()));
        assert_eq!(merged.bit_rate, Some(64_000)); // Kept from base
        assert_eq!(merged.auto_save_interval_minutes, Some(5));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            bit_rate: Some(192_000),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.bit_rate, Some(192_000));
    }

    #[test]
    fn output_dir_or_default_uses_configured() {
        let config = AppConfig {
            output_dir: Some("/tmp/segments".to_string()),
            ..Default::default()
        };
        assert_eq!(config.output_dir_or_default(), PathBuf::from("/tmp/segments"));
    }

    #[test]
    fn output_dir_or_default_falls_back_to_cache() {
        let dir = AppConfig::empty().output_dir_or_default();
        assert!(dir.to_string_lossy().contains("micseg"));
        assert!(dir.to_string_lossy().contains("recordings"));
    }

    #[test]
    fn bit_rate_or_default() {
        assert_eq!(AppConfig::empty().bit_rate_or_default().as_bps(), 128_000);
        let config = AppConfig {
            bit_rate: Some(64_000),
            ..Default::default()
        };
        assert_eq!(config.bit_rate_or_default().as_bps(), 64_000);
    }

    #[test]
    fn interval_or_default_is_disabled() {
        assert_eq!(AppConfig::empty().auto_save_interval_or_default(), 0);
    }
}
