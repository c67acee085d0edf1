//! Engine configuration
//!
//! Stored as pretty JSON. Missing fields fall back to the defaults below.

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_PIXEL_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shown in the window title next to the frame rate
    pub app_name: String,
    /// Primary buffer size in pixels
    pub screen_width: u32,
    pub screen_height: u32,
    /// Size of one buffer pixel on the presentation surface
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub vsync: bool,
}

impl EngineConfig {
    pub fn new(app_name: impl Into<String>, screen_width: u32, screen_height: u32) -> Self {
        Self {
            app_name: app_name.into(),
            screen_width,
            screen_height,
            ..Self::default()
        }
    }

    /// Builder-style pixel scale setter
    pub fn with_pixel_size(mut self, pixel_width: u32, pixel_height: u32) -> Self {
        self.pixel_width = pixel_width;
        self.pixel_height = pixel_height;
        self
    }

    /// Reject any zero dimension
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("pixel_width", self.pixel_width),
            ("pixel_height", self.pixel_height),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(Error::InvalidConfiguration(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    /// Size of the presentation surface in surface pixels
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.screen_width * self.pixel_width,
            self.screen_height * self.pixel_height,
        )
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Undefined".to_string(),
            screen_width: DEFAULT_WIDTH,
            screen_height: DEFAULT_HEIGHT,
            pixel_width: DEFAULT_PIXEL_SIZE,
            pixel_height: DEFAULT_PIXEL_SIZE,
            vsync: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size(), (1024, 960));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        for config in [
            EngineConfig::new("t", 0, 240),
            EngineConfig::new("t", 256, 0),
            EngineConfig::new("t", 256, 240).with_pixel_size(0, 4),
            EngineConfig::new("t", 256, 240).with_pixel_size(4, 0),
        ] {
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "app_name": "demo", "screen_width": 320 }"#).unwrap();
        assert_eq!(config.app_name, "demo");
        assert_eq!(config.screen_width, 320);
        assert_eq!(config.screen_height, DEFAULT_HEIGHT);
        assert_eq!(config.pixel_width, DEFAULT_PIXEL_SIZE);
        assert!(config.vsync);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("rasterkit-config-{}.json", std::process::id()));
        let config = EngineConfig::new("saved", 160, 120).with_pixel_size(2, 3);
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = EngineConfig::load("/nonexistent/rasterkit.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
