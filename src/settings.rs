use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, TransparencyError};

/// Channel value a pixel must exceed on R, G and B to count as background
pub const DEFAULT_THRESHOLD: u8 = 250;

/// Icon converted in place when the tool runs without arguments
pub const LEGACY_ICON_PATH: &str = "window/Assets.xcassets/win.imageset/win.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    /// Image to read (any format the `image` crate decodes)
    pub input_path: PathBuf,
    /// PNG to write; may equal `input_path` for in-place conversion
    pub output_path: PathBuf,
    /// Pixels with R, G and B all strictly above this become transparent (default: 250)
    pub threshold: u8,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(LEGACY_ICON_PATH),
            output_path: PathBuf::from(LEGACY_ICON_PATH),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ConvertSettings {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, threshold: u8) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            threshold,
        }
    }

    /// Load settings from a JSON file. Missing fields fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| TransparencyError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| TransparencyError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(TransparencyError::InvalidParameter("input path is empty".to_string()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(TransparencyError::InvalidParameter("output path is empty".to_string()));
        }
        Ok(())
    }

    pub fn is_in_place(&self) -> bool {
        self.input_path == self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ConvertSettings::default();
        assert_eq!(settings.threshold, 250);
        assert_eq!(settings.input_path, PathBuf::from(LEGACY_ICON_PATH));
        assert!(settings.is_in_place());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "threshold": 240 }"#).unwrap();

        let settings = ConvertSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.threshold, 240);
        assert_eq!(settings.output_path, PathBuf::from(LEGACY_ICON_PATH));
    }

    #[test]
    fn test_json_threshold_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "threshold": 300 }"#).unwrap();

        let err = ConvertSettings::from_json_file(&path).unwrap_err();
        assert!(matches!(err, TransparencyError::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConvertSettings::from_json_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, TransparencyError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let settings = ConvertSettings::new("", "out.png", 250);
        assert!(matches!(settings.validate(), Err(TransparencyError::InvalidParameter(_))));
        assert!(ConvertSettings::new("in.png", "out.png", 0).validate().is_ok());
    }
}
