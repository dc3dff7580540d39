use std::time::Duration;

use super::pacing::Pacing;
use super::position::PositionTracker;
use crate::awake::{StayAwake, WakeHandle};
use crate::clock::{Clock, TimerHandle};
use crate::config::PacingConfig;

/// Whether words are currently advancing on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Running,
}

/// What a playback tick did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved to this index; the next tick is armed.
    Advanced(usize),
    /// Reached the last word at this index and stopped.
    Finished(usize),
}

/// RSVP scheduler: advances a [`PositionTracker`] one word per tick.
///
/// At most one tick is armed at a time. Every operation that changes
/// pace or position while running disarms it first and arms a fresh one,
/// so a stale tick can never advance the cursor twice. The stay-awake
/// lock is held exactly while running.
pub struct PlaybackEngine<C: Clock, W: StayAwake> {
    clock: C,
    awake: W,
    pacing: Pacing,
    state: PlaybackState,
    pending: Option<TimerHandle>,
    wake: Option<WakeHandle>,
}

impl<C: Clock, W: StayAwake> PlaybackEngine<C, W> {
    pub fn new(clock: C, awake: W, config: PacingConfig) -> Self {
        Self {
            clock,
            awake,
            pacing: Pacing::new(config),
            state: PlaybackState::Stopped,
            pending: None,
            wake: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn stay_awake(&self) -> &W {
        &self.awake
    }

    /// True while the stay-awake lock is held.
    pub fn holds_wake_lock(&self) -> bool {
        self.wake.is_some()
    }

    /// Start advancing from the current word.
    ///
    /// Does nothing when already running or when there are no words.
    pub fn play(&mut self, pos: &PositionTracker) {
        if self.is_running() || pos.is_empty() {
            return;
        }
        if self.pacing.ramp_enabled() {
            self.pacing.start_ramp(pos.index());
        }
        self.state = PlaybackState::Running;
        match self.awake.acquire() {
            Ok(handle) => self.wake = Some(handle),
            Err(e) => log::warn!("Playing without stay-awake: {}", e),
        }
        log::debug!(
            "Playback started at word {} ({:.0} WPM)",
            pos.index(),
            self.pacing.wpm_at(pos.index())
        );
        self.schedule(pos);
    }

    /// Stop advancing. Does nothing when already stopped.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.stop();
    }

    fn stop(&mut self) {
        self.cancel_pending();
        self.state = PlaybackState::Stopped;
        if let Some(handle) = self.wake.take() {
            self.awake.release(handle);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel(handle);
        }
    }

    fn schedule(&mut self, pos: &PositionTracker) {
        let delay = self.pacing.delay_at(pos.index());
        self.pending = Some(self.clock.schedule_after(delay));
    }

    fn reschedule(&mut self, pos: &PositionTracker) {
        if self.is_running() {
            self.cancel_pending();
            self.schedule(pos);
        }
    }

    /// Set the pace, clamped into the configured bounds. Returns the pace
    /// actually applied.
    pub fn set_speed(&mut self, wpm: u32, pos: &PositionTracker) -> u32 {
        let running = self.is_running();
        let applied = self.pacing.set_speed(wpm, pos.index(), running);
        self.reschedule(pos);
        applied
    }

    /// Raise the pace by one step. Returns whether it changed.
    pub fn speed_up(&mut self, pos: &PositionTracker) -> bool {
        let current = self.pacing.speed_wpm();
        let step = crate::config::WPM_STEP;
        current != self.set_speed(current.saturating_add(step), pos)
    }

    /// Lower the pace by one step. Returns whether it changed.
    pub fn slow_down(&mut self, pos: &PositionTracker) -> bool {
        let current = self.pacing.speed_wpm();
        let step = crate::config::WPM_STEP;
        current != self.set_speed(current.saturating_sub(step), pos)
    }

    pub fn set_ramp_enabled(&mut self, enabled: bool, pos: &PositionTracker) {
        self.pacing.set_ramp_enabled(enabled, pos.index());
        self.reschedule(pos);
    }

    /// Jump to `index` (clamped). A running engine keeps running from there.
    pub fn seek(&mut self, index: i64, pos: &mut PositionTracker) -> usize {
        if self.is_running() {
            self.cancel_pending();
        }
        let index = pos.seek(index);
        self.reschedule(pos);
        index
    }

    pub fn reset(&mut self, pos: &mut PositionTracker) -> usize {
        self.seek(0, pos)
    }

    /// Manual step; an armed tick keeps its schedule.
    pub fn step_forward(&mut self, pos: &mut PositionTracker) -> usize {
        pos.step_forward()
    }

    pub fn step_backward(&mut self, pos: &mut PositionTracker) -> usize {
        pos.step_backward()
    }

    /// Handle an expired timer. Handles other than the armed tick are
    /// ignored and yield `None`.
    pub fn handle_timer(&mut self, handle: TimerHandle, pos: &mut PositionTracker) -> Option<TickOutcome> {
        if self.pending != Some(handle) {
            return None;
        }
        self.pending = None;

        if pos.advance() {
            self.schedule(pos);
            Some(TickOutcome::Advanced(pos.index()))
        } else {
            self.stop();
            log::debug!("Playback finished at word {}", pos.index());
            Some(TickOutcome::Finished(pos.index()))
        }
    }

    /// Drain every expired timer from the clock.
    pub fn run_due(&mut self, pos: &mut PositionTracker) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        while let Some(handle) = self.clock.take_expired() {
            outcomes.extend(self.handle_timer(handle, pos));
        }
        outcomes
    }

    /// Pace that applies to the current word.
    pub fn current_wpm(&self, pos: &PositionTracker) -> f64 {
        self.pacing.wpm_at(pos.index())
    }

    pub fn calculate_delay_ms(&self, pos: &PositionTracker) -> f64 {
        self.pacing.delay_ms_at(pos.index())
    }

    pub fn calculate_delay(&self, pos: &PositionTracker) -> Duration {
        self.pacing.delay_at(pos.index())
    }

    /// Time until the armed tick is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending?;
        self.clock.time_until_next()
    }

    /// Stop and drop the ramp anchors before another document is opened.
    /// Speed and the ramp flag carry over.
    pub fn reset_for_new_document(&mut self) {
        self.stop();
        self.pacing.reset_anchors();
    }
}

impl<C: Clock, W: StayAwake> Drop for PlaybackEngine<C, W> {
    fn drop(&mut self) {
        self.stop();
    }
}
