use std::time::Duration;

use crate::config::PacingConfig;

/// Speed settings and the ramp anchors.
///
/// All paces stay within the configured bounds, so the delay division
/// never sees zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    config: PacingConfig,
    speed_wpm: u32,
    target_speed_wpm: u32,
    ramp_enabled: bool,
    ramp_start_wpm: f64,
    ramp_start_word_index: usize,
}

impl Pacing {
    /// Pacing at the configured default speed. Out-of-order or
    /// out-of-range config values are repaired first.
    pub fn new(config: PacingConfig) -> Self {
        let config = config.normalized();
        Self {
            config,
            speed_wpm: config.default_wpm,
            target_speed_wpm: config.default_wpm,
            ramp_enabled: false,
            ramp_start_wpm: f64::from(config.ramp_start_wpm),
            ramp_start_word_index: 0,
        }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    pub fn speed_wpm(&self) -> u32 {
        self.speed_wpm
    }

    pub fn target_speed_wpm(&self) -> u32 {
        self.target_speed_wpm
    }

    pub fn ramp_enabled(&self) -> bool {
        self.ramp_enabled
    }

    pub fn ramp_start_wpm(&self) -> f64 {
        self.ramp_start_wpm
    }

    pub fn ramp_start_word_index(&self) -> usize {
        self.ramp_start_word_index
    }

    pub fn ramp_duration_words(&self) -> usize {
        self.config.ramp_duration_words
    }

    /// Effective pace at word `index`.
    ///
    /// With the ramp on, the pace moves linearly from the ramp start to
    /// the target over `ramp_duration_words` words and holds there.
    pub fn wpm_at(&self, index: usize) -> f64 {
        if !self.ramp_enabled {
            return f64::from(self.speed_wpm);
        }
        let elapsed = index as f64 - self.ramp_start_word_index as f64;
        let duration = self.config.ramp_duration_words.max(1) as f64;
        let progress = (elapsed / duration).clamp(0.0, 1.0);
        let target = f64::from(self.target_speed_wpm);
        self.ramp_start_wpm + (target - self.ramp_start_wpm) * progress
    }

    /// Milliseconds a word at `index` stays on screen.
    pub fn delay_ms_at(&self, index: usize) -> f64 {
        let floor = f64::from(self.config.min_wpm.max(1));
        60_000.0 / self.wpm_at(index).max(floor)
    }

    /// [`delay_ms_at`](Self::delay_ms_at) rounded to whole microseconds.
    pub fn delay_at(&self, index: usize) -> Duration {
        Duration::from_micros((self.delay_ms_at(index) * 1000.0).round() as u64)
    }

    /// Anchor a fresh ramp at `index` starting from the fixed ramp pace.
    pub(crate) fn start_ramp(&mut self, index: usize) {
        self.ramp_start_word_index = index;
        self.ramp_start_wpm = f64::from(self.config.ramp_start_wpm);
        self.target_speed_wpm = self.speed_wpm;
    }

    /// Set the user's pace.
    ///
    /// A running ramp is re-anchored at the pace currently shown so the
    /// curve stays continuous.
    pub(crate) fn set_speed(&mut self, wpm: u32, index: usize, running: bool) -> u32 {
        let wpm = self.config.clamp_wpm(wpm);
        if self.ramp_enabled && running {
            self.ramp_start_wpm = self.wpm_at(index);
            self.ramp_start_word_index = index;
        }
        self.speed_wpm = wpm;
        self.target_speed_wpm = wpm;
        wpm
    }

    pub(crate) fn set_ramp_enabled(&mut self, enabled: bool, index: usize) {
        self.ramp_enabled = enabled;
        if enabled {
            self.ramp_start_word_index = index;
            self.ramp_start_wpm = f64::from(self.speed_wpm);
            self.target_speed_wpm = self.speed_wpm;
        }
    }

    /// Forget ramp anchors, keeping speed and the ramp flag.
    pub(crate) fn reset_anchors(&mut self) {
        self.ramp_start_word_index = 0;
        self.ramp_start_wpm = f64::from(self.config.ramp_start_wpm);
        self.target_speed_wpm = self.speed_wpm;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}
