//! # Configuration Module
//!
//! Bundles the frame source and segmentation parameters into one document
//! that can be saved to and loaded from a JSON file. Fields missing from a
//! file fall back to their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::frames::FrameSourceConfig;
use crate::segmentation::SegmenterConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub segmentation: SegmenterConfig,
    pub frames: FrameSourceConfig,
}

impl TranscriptionConfig {
    /// Loads a config from a JSON file.
    ///
    /// # Errors
    /// Fails if the file cannot be read, is not valid JSON, or describes an
    /// invalid frame source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;

        let config: TranscriptionConfig = serde_json::from_str(&data)
            .with_context(|| format!("cannot parse config {}", path.display()))?;
        config.frames.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json_string = self.to_json()?;
        fs::write(path, json_string)
            .with_context(|| format!("cannot write config {}", path.display()))?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("transcriber-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn save_then_load_preserves_values() {
        let mut config = TranscriptionConfig::default();
        config.segmentation.pitch_tolerance = 3;
        config.frames.hop_length = 256;

        let path = temp_path("roundtrip");
        config.save(&path).unwrap();
        let loaded = TranscriptionConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: TranscriptionConfig =
            serde_json::from_str(r#"{"segmentation": {"min_note_duration": 0.2}}"#).unwrap();
        assert_eq!(config.segmentation.min_note_duration, 0.2);
        assert_eq!(config.segmentation.pitch_tolerance, 2);
        assert_eq!(config.frames, FrameSourceConfig::default());
    }

    #[test]
    fn invalid_frame_source_is_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, r#"{"frames": {"hop_length": 0}}"#).unwrap();
        let result = TranscriptionConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TranscriptionConfig::load("/nonexistent/transcriber.json").is_err());
    }
}
