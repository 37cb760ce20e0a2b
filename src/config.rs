//! Configuration loading and management

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::model::Handedness;

/// Viewer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the model assets
    pub asset_dir: PathBuf,

    /// File name of the right-handed model, relative to `asset_dir`
    pub right_model: PathBuf,

    /// File name of the left-handed model, relative to `asset_dir`
    pub left_model: PathBuf,

    /// Handedness loaded at startup
    pub handedness: Handedness,

    /// Frame ticks per second driving the mixer
    pub frames_per_second: u32,

    /// Show the debug skeleton overlay with the model
    pub show_skeleton: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets").join("3d"),
            right_model: PathBuf::from("alphabet.glb"),
            left_model: PathBuf::from("alphabet_left.glb"),
            handedness: Handedness::Right,
            frames_per_second: 60,
            show_skeleton: true,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("FINGERSPELL_ASSET_DIR") {
            config.asset_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("FINGERSPELL_RIGHT_MODEL") {
            config.right_model = PathBuf::from(file);
        }
        if let Some(file) = lookup("FINGERSPELL_LEFT_MODEL") {
            config.left_model = PathBuf::from(file);
        }
        if let Some(value) = lookup("FINGERSPELL_HANDEDNESS") {
            config.handedness = value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid FINGERSPELL_HANDEDNESS")?;
        }
        if let Some(value) = lookup("FINGERSPELL_FPS") {
            let fps: u32 = value
                .trim()
                .parse()
                .with_context(|| format!("invalid FINGERSPELL_FPS: {value:?}"))?;
            if fps == 0 {
                bail!("FINGERSPELL_FPS must be greater than zero");
            }
            config.frames_per_second = fps;
        }
        if let Some(value) = lookup("FINGERSPELL_SKELETON") {
            config.show_skeleton = parse_flag(&value)
                .with_context(|| format!("invalid FINGERSPELL_SKELETON: {value:?}"))?;
        }

        Ok(config)
    }

    /// Full path of the model asset for a handedness
    pub fn model_path(&self, handedness: Handedness) -> PathBuf {
        let file = match handedness {
            Handedness::Right => &self.right_model,
            Handedness::Left => &self.left_model,
        };
        self.asset_dir.join(file)
    }

    /// Seconds between two frame ticks
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second))
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}
