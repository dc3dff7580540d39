//! Reader configuration: speed bounds, ramp defaults and import limits.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Slowest allowed pace.
pub const MIN_WPM: u32 = 60;
/// Fastest allowed pace.
pub const MAX_WPM: u32 = 1000;
pub const DEFAULT_WPM: u32 = 300;
/// Fixed pace a ramp starts from when playback begins.
pub const RAMP_START_WPM: u32 = 120;
/// Number of words over which a ramp reaches its target.
pub const RAMP_DURATION_WORDS: usize = 100;
/// Largest accepted source file, in bytes.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
/// Increment used by step-wise speed controls.
pub const WPM_STEP: u32 = 25;

/// Pacing bounds and ramp defaults for the playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PacingConfig {
    pub min_wpm: u32,
    pub max_wpm: u32,
    pub default_wpm: u32,
    pub ramp_start_wpm: u32,
    pub ramp_duration_words: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_wpm: MIN_WPM,
            max_wpm: MAX_WPM,
            default_wpm: DEFAULT_WPM,
            ramp_start_wpm: RAMP_START_WPM,
            ramp_duration_words: RAMP_DURATION_WORDS,
        }
    }
}

impl PacingConfig {
    /// Clamp a pace into `[min_wpm, max_wpm]`.
    ///
    /// Every speed setter goes through here, so a pace of zero can never
    /// reach the delay computation.
    pub fn clamp_wpm(&self, wpm: u32) -> u32 {
        wpm.min(self.max_wpm).max(self.min_wpm)
    }

    /// Bounds ordered and non-zero, defaults inside them.
    pub(crate) fn normalized(self) -> Self {
        let min_wpm = self.min_wpm.max(1);
        let max_wpm = self.max_wpm.max(min_wpm);
        Self {
            min_wpm,
            max_wpm,
            default_wpm: self.default_wpm.clamp(min_wpm, max_wpm),
            ramp_start_wpm: self.ramp_start_wpm.clamp(min_wpm, max_wpm),
            ramp_duration_words: self.ramp_duration_words.max(1),
        }
    }
}

/// Limits applied before a file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportConfig {
    pub max_file_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub pacing: PacingConfig,
    pub import: ImportConfig,
}

impl ReaderConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ReaderConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Load a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Repair values that would break the pacing or import arithmetic.
    pub fn normalized(self) -> Self {
        Self {
            pacing: self.pacing.normalized(),
            import: ImportConfig {
                max_file_size: self.import.max_file_size.max(1),
            },
        }
    }
}
