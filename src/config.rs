// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from a YAML or JSON file (picked by extension). Every
//! field has a default, so a config file only needs the values it changes.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::annotation::DEFAULT_CIRCLE_RADIUS;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "timber-annotate.yaml";

/// Look of the note callouts drawn next to annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteStyle {
    /// Characters shown before the note is cut off with an ellipsis.
    pub preview_chars: usize,
    /// Maximum width of an expanded (hovered) callout, in surface pixels.
    pub wrap_width: f32,
    pub line_height: f32,
    pub font_size: f32,
    pub padding: f32,
}

impl Default for NoteStyle {
    fn default() -> Self {
        Self {
            preview_chars: 20,
            wrap_width: 200.0,
            line_height: 16.0,
            font_size: 12.0,
            padding: 6.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Radius of newly placed circles, in image pixels.
    pub circle_radius: f32,
    /// Slack allowed when hit-testing the pointer against annotations.
    pub hit_tolerance: f32,
    pub note: NoteStyle,
    /// Photo set to load at startup instead of the demo photos.
    pub photo_set: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            circle_radius: DEFAULT_CIRCLE_RADIUS,
            hit_tolerance: 6.0,
            note: NoteStyle::default(),
            photo_set: None,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?,
            other => bail!("Unsupported config extension: {:?}", other),
        };
        config.validate()?;

        // A relative photo set lives next to the config file
        if let (Some(set), Some(dir)) = (config.photo_set.as_mut(), path.parent()) {
            if set.is_relative() {
                *set = dir.join(&*set);
            }
        }
        Ok(config)
    }

    /// Resolve the config: explicit path, then the default file, then defaults.
    ///
    /// A broken config file is logged and replaced by the defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        let Some(path) = candidate else {
            log::debug!("No config file, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.circle_radius > 0.0) {
            bail!("circle_radius must be positive, got {}", self.circle_radius);
        }
        if self.hit_tolerance < 0.0 {
            bail!("hit_tolerance must not be negative, got {}", self.hit_tolerance);
        }
        if self.note.preview_chars == 0 {
            bail!("note.preview_chars must be at least 1");
        }
        if !(self.note.wrap_width > 0.0 && self.note.line_height > 0.0 && self.note.font_size > 0.0) {
            bail!("note wrap_width, line_height and font_size must be positive");
        }
        if !(self.note.padding >= 0.0) {
            bail!("note.padding must not be negative, got {}", self.note.padding);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("timber-annotate-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let path = write_temp("partial.yaml", "circle_radius: 32\nnote:\n  preview_chars: 10\n");
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.circle_radius, 32.0);
        assert_eq!(config.note.preview_chars, 10);
        assert_eq!(config.note.wrap_width, NoteStyle::default().wrap_width);
        assert_eq!(config.hit_tolerance, 6.0);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_config() {
        let path = write_temp("config.json", r#"{"hit_tolerance": 2.5, "photo_set": "job.yaml"}"#);
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.hit_tolerance, 2.5);
        assert_eq!(config.photo_set, path.parent().map(|dir| dir.join("job.yaml")));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = write_temp("bad.yaml", "circle_radius: -1\n");
        assert!(Config::from_file(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_absolute_photo_set_is_kept() {
        let set = std::env::temp_dir().join("jobs").join("smith.yaml");
        let path = write_temp("absolute.json", &serde_json::json!({ "photo_set": set }).to_string());
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.photo_set, Some(set));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_negative_padding_rejected() {
        let path = write_temp("padding.yaml", "note:\n  padding: -2\n");
        assert!(Config::from_file(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let missing = std::env::temp_dir().join("timber-annotate-does-not-exist.yaml");
        assert_eq!(Config::load(Some(&missing)), Config::default());
    }
}
