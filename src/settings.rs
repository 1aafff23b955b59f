//! Headless runner settings
//!
//! Read from an optional JSON file. Gameplay tuning stays in
//! [`crate::consts`]; these only control how the runner drives a session.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;

/// How the autopilot steers the falling token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AutopilotStyle {
    /// Drop straight down from the spawn point
    Drop,
    /// Steer toward a settled token of the same level
    #[default]
    Merge,
}

impl AutopilotStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutopilotStyle::Drop => "drop",
            AutopilotStyle::Merge => "merge",
        }
    }
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spawn RNG seed
    pub seed: u64,
    /// Simulated frames per second (sets the frame delta)
    pub fps: u32,
    /// Frame cap per run
    pub max_frames: u64,
    /// Runs to play back to back in one session
    pub runs: u32,
    pub autopilot: AutopilotStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            fps: TARGET_FPS,
            max_frames: 60 * 60 * TARGET_FPS as u64,
            runs: 1,
            autopilot: AutopilotStyle::Merge,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("invalid settings JSON")?;
        Ok(settings.sanitized())
    }

    /// Load settings from `path`; a missing file falls back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("{} not found, using default settings", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Frame delta in seconds
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Replace values the runner cannot use with defaults
    pub fn sanitized(mut self) -> Self {
        if self.fps == 0 {
            log::warn!("fps must be positive, using {}", TARGET_FPS);
            self.fps = TARGET_FPS;
        }
        self
    }
}
