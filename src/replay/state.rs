//! Replay playback state
//!
//! [`PlaybackCursor`] is the only mutable state of a running replay. It is a
//! plain value: commands and elapsed wall-clock time go in, a clamped frame
//! index comes out, so it can be driven without a window.

use std::time::Duration;

use bevy::prelude::*;

use crate::constants::{DEFAULT_SPEED, MAX_ADVANCES_PER_UPDATE, STEP_LONG_SECS, STEP_SHORT_SECS};
use crate::demo::SessionHeader;

use super::boundaries::{BoundaryIndex, BoundaryKind};

/// Frame-rate derived timing for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    pub frame_rate: f64,
    pub frame_rate_rounded: usize,
    pub frame_count: usize,
}

impl PlaybackClock {
    pub fn new(header: &SessionHeader, frame_count: usize) -> Self {
        Self {
            frame_rate: header.frame_rate,
            frame_rate_rounded: header.frame_rate_rounded(),
            frame_count,
        }
    }

    pub fn last_index(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    /// Wall-clock time one frame is shown at `speed`
    pub fn frame_interval(&self, speed: f32) -> Duration {
        let speed = if speed > 0.0 { speed as f64 } else { DEFAULT_SPEED as f64 };
        if self.frame_rate <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64((1.0 / speed) * (1.0 / self.frame_rate))
    }

    /// Time still to wait before the next advance, never negative
    pub fn frame_budget(&self, speed: f32, elapsed: Duration) -> Duration {
        self.frame_interval(speed).saturating_sub(elapsed)
    }

    /// Frames covered by a navigation step
    pub fn step_frames(&self, granularity: Granularity) -> usize {
        self.frame_rate_rounded * granularity.seconds()
    }

    pub fn seconds_at(&self, frame: usize) -> f64 {
        if self.frame_rate <= 0.0 {
            return 0.0;
        }
        frame as f64 / self.frame_rate
    }
}

/// Step size of a seek command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Short,
    Long,
}

impl Granularity {
    pub fn seconds(self) -> usize {
        match self {
            Granularity::Short => STEP_SHORT_SECS,
            Granularity::Long => STEP_LONG_SECS,
        }
    }
}

/// Keyboard commands understood by the playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayCommand {
    TogglePause,
    StepBack(Granularity),
    StepForward(Granularity),
    JumpPrevious(BoundaryKind),
    JumpNext(BoundaryKind),
}

/// Current viewing position, pause flag and speed
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackCursor {
    pub current_frame: usize,
    pub paused: bool,
    pub speed: f32,
    /// Wall-clock time since the last advance
    since_advance: Duration,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self {
            current_frame: 0,
            paused: false,
            speed: DEFAULT_SPEED,
            since_advance: Duration::ZERO,
        }
    }
}

impl PlaybackCursor {
    pub fn paused() -> Self {
        Self {
            paused: true,
            ..Default::default()
        }
    }

    /// Apply one command. Navigation works while paused and is always clamped.
    pub fn apply(&mut self, command: ReplayCommand, clock: &PlaybackClock, boundaries: &BoundaryIndex) {
        match command {
            ReplayCommand::TogglePause => {
                self.paused = !self.paused;
                self.since_advance = Duration::ZERO;
            }
            ReplayCommand::StepBack(granularity) => {
                self.current_frame = self.current_frame.saturating_sub(clock.step_frames(granularity));
            }
            ReplayCommand::StepForward(granularity) => {
                self.current_frame = self.current_frame.saturating_add(clock.step_frames(granularity));
            }
            ReplayCommand::JumpPrevious(kind) => {
                if let Some(frame) = boundaries.previous(kind, self.current_frame, clock.frame_rate_rounded) {
                    self.current_frame = frame;
                }
            }
            ReplayCommand::JumpNext(kind) => {
                if let Some(frame) = boundaries.next(kind, self.current_frame) {
                    self.current_frame = frame;
                }
            }
        }
        self.clamp(clock);
    }

    /// Set the speed read from live input; non-positive values are ignored
    pub fn set_speed(&mut self, speed: f32) {
        if speed > 0.0 {
            self.speed = speed;
        }
    }

    /// Account for `elapsed` wall-clock time and advance once per spent frame
    /// budget. Returns the number of frames advanced.
    ///
    /// The last frame is held while still playing.
    pub fn tick(&mut self, clock: &PlaybackClock, elapsed: Duration) -> usize {
        if self.paused {
            self.since_advance = Duration::ZERO;
            return 0;
        }

        self.since_advance += elapsed;
        let interval = clock.frame_interval(self.speed);
        let mut advanced = 0;

        while clock.frame_budget(self.speed, self.since_advance).is_zero() {
            if self.current_frame >= clock.last_index() || advanced >= MAX_ADVANCES_PER_UPDATE {
                self.since_advance = Duration::ZERO;
                break;
            }
            self.current_frame += 1;
            advanced += 1;
            self.since_advance = self.since_advance.saturating_sub(interval);
        }

        self.clamp(clock);
        advanced
    }

    fn clamp(&mut self, clock: &PlaybackClock) {
        self.current_frame = self.current_frame.min(clock.last_index());
    }
}

/// Playback speed from the held modifier keys; slow wins when both are held
pub fn playback_speed(fast_held: bool, slow_held: bool, fast_speed: f32, slow_speed: f32) -> f32 {
    if slow_held {
        slow_speed
    } else if fast_held {
        fast_speed
    } else {
        DEFAULT_SPEED
    }
}

/// Replay playback state
#[derive(Resource, Debug, Default)]
pub struct ReplayState {
    pub cursor: PlaybackCursor,
    /// Set by the input handler; playback stops advancing once set
    pub quit_requested: bool,
}

impl ReplayState {
    pub fn new(start_paused: bool) -> Self {
        Self {
            cursor: if start_paused {
                PlaybackCursor::paused()
            } else {
                PlaybackCursor::default()
            },
            quit_requested: false,
        }
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Advance playback by `elapsed`; nothing moves once quit was requested
    pub fn advance(&mut self, clock: &PlaybackClock, elapsed: Duration) -> usize {
        if self.quit_requested {
            return 0;
        }
        self.cursor.tick(clock, elapsed)
    }

    /// Get formatted speed string for display
    pub fn speed_string(&self) -> String {
        if self.cursor.paused {
            "PAUSED".to_string()
        } else {
            format!("{:.1}x", self.cursor.speed)
        }
    }

    /// Get formatted time string for display (round, current / total)
    pub fn time_string(&self, clock: &PlaybackClock, round: usize) -> String {
        let current = clock.seconds_at(self.cursor.current_frame);
        let total = clock.seconds_at(clock.last_index());
        format!("Round {}  {} / {}", round, clock_time(current), clock_time(total))
    }
}

/// Format seconds as `m:ss`
pub fn clock_time(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(frame_count: usize) -> PlaybackClock {
        PlaybackClock {
            frame_rate: 64.0,
            frame_rate_rounded: 64,
            frame_count,
        }
    }

    #[test]
    fn test_recording_duration_from_clock() {
        let clock = clock(64 * 90 + 1);
        assert_eq!(clock.seconds_at(clock.last_index()), 90.0);
        assert_eq!(clock_time(clock.seconds_at(clock.last_index())), "1:30");
        assert_eq!(clock_time(clock.seconds_at(64 * 5)), "0:05");

        let empty = PlaybackClock {
            frame_rate: 0.0,
            frame_rate_rounded: 0,
            frame_count: 0,
        };
        assert_eq!(empty.seconds_at(empty.last_index()), 0.0);
    }

    fn rounds() -> BoundaryIndex {
        let mut index = BoundaryIndex::default();
        index.push_round(300);
        index.push_round(700);
        index
    }

    fn at(frame: usize) -> PlaybackCursor {
        PlaybackCursor {
            current_frame: frame,
            ..Default::default()
        }
    }

    #[test]
    fn test_jump_previous_round_scenario() {
        let mut cursor = at(705);
        cursor.apply(ReplayCommand::JumpPrevious(BoundaryKind::Round), &clock(1000), &rounds());
        assert_eq!(cursor.current_frame, 300);
    }

    #[test]
    fn test_step_forward_clamps_to_last_frame() {
        let mut cursor = at(700);
        cursor.apply(ReplayCommand::StepForward(Granularity::Short), &clock(1000), &rounds());
        assert_eq!(cursor.current_frame, 999);
    }

    #[test]
    fn test_steps_stay_in_range() {
        let clock = clock(5000);
        let index = rounds();
        let mut cursor = at(100);

        cursor.apply(ReplayCommand::StepBack(Granularity::Short), &clock, &index);
        assert_eq!(cursor.current_frame, 0);

        cursor.apply(ReplayCommand::StepForward(Granularity::Short), &clock, &index);
        assert_eq!(cursor.current_frame, 640);
        cursor.apply(ReplayCommand::StepForward(Granularity::Long), &clock, &index);
        assert_eq!(cursor.current_frame, 640 + 1920);
        cursor.apply(ReplayCommand::StepBack(Granularity::Long), &clock, &index);
        assert_eq!(cursor.current_frame, 640);

        for _ in 0..10 {
            cursor.apply(ReplayCommand::StepForward(Granularity::Long), &clock, &index);
            assert!(cursor.current_frame <= clock.last_index());
        }
        assert_eq!(cursor.current_frame, 4999);
    }

    #[test]
    fn test_jump_next_and_no_ops() {
        let clock = clock(1000);
        let index = rounds();
        let mut cursor = at(10);

        cursor.apply(ReplayCommand::JumpNext(BoundaryKind::Round), &clock, &index);
        assert_eq!(cursor.current_frame, 300);
        cursor.apply(ReplayCommand::JumpNext(BoundaryKind::Round), &clock, &index);
        assert_eq!(cursor.current_frame, 700);
        cursor.apply(ReplayCommand::JumpNext(BoundaryKind::Round), &clock, &index);
        assert_eq!(cursor.current_frame, 700);

        // No half markers recorded
        cursor.apply(ReplayCommand::JumpPrevious(BoundaryKind::Half), &clock, &index);
        assert_eq!(cursor.current_frame, 700);
        cursor.apply(ReplayCommand::JumpNext(BoundaryKind::Half), &clock, &index);
        assert_eq!(cursor.current_frame, 700);
    }

    #[test]
    fn test_navigation_works_while_paused() {
        let clock = clock(1000);
        let mut cursor = at(0);
        cursor.apply(ReplayCommand::TogglePause, &clock, &rounds());
        assert!(cursor.paused);

        cursor.apply(ReplayCommand::JumpNext(BoundaryKind::Round), &clock, &rounds());
        assert_eq!(cursor.current_frame, 300);
        assert!(cursor.paused);

        assert_eq!(cursor.tick(&clock, Duration::from_secs(1)), 0);
        assert_eq!(cursor.current_frame, 300);
    }

    #[test]
    fn test_tick_follows_frame_budget() {
        let clock = clock(1000);
        let mut cursor = at(0);

        // Less than one frame interval (1/64 s) waits
        assert_eq!(cursor.tick(&clock, Duration::from_millis(10)), 0);
        assert_eq!(cursor.tick(&clock, Duration::from_millis(10)), 1);
        assert_eq!(cursor.current_frame, 1);

        // Five frame intervals at once
        assert_eq!(cursor.tick(&clock, Duration::from_secs_f64(5.0 / 64.0)), 5);

        // Fast speed shortens the interval; the leftover from before still counts
        cursor.set_speed(5.0);
        assert_eq!(cursor.tick(&clock, Duration::from_secs_f64(1.0 / 64.0)), 6);
    }

    #[test]
    fn test_terminal_hold() {
        let clock = clock(10);
        let mut cursor = at(8);
        cursor.tick(&clock, Duration::from_secs(1));
        assert_eq!(cursor.current_frame, 9);
        assert!(!cursor.paused);

        assert_eq!(cursor.tick(&clock, Duration::from_secs(1)), 0);
        assert_eq!(cursor.current_frame, 9);
    }

    #[test]
    fn test_frame_budget() {
        let clock = clock(10);
        assert_eq!(clock.frame_budget(1.0, Duration::from_secs(1)), Duration::ZERO);
        let budget = clock.frame_budget(0.5, Duration::ZERO);
        assert!((budget.as_secs_f64() - 2.0 / 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_speed_slow_wins() {
        assert_eq!(playback_speed(false, false, 5.0, 0.5), 1.0);
        assert_eq!(playback_speed(true, false, 5.0, 0.5), 5.0);
        assert_eq!(playback_speed(false, true, 5.0, 0.5), 0.5);
        assert_eq!(playback_speed(true, true, 5.0, 0.5), 0.5);
    }

    #[test]
    fn test_no_advance_after_quit() {
        let clock = clock(1000);
        let mut state = ReplayState::new(false);
        assert_eq!(state.advance(&clock, Duration::from_secs_f64(2.0 / 64.0)), 2);

        state.request_quit();
        assert_eq!(state.advance(&clock, Duration::from_secs(1)), 0);
        assert_eq!(state.cursor.current_frame, 2);
    }

    #[test]
    fn test_display_strings() {
        let mut state = ReplayState::new(true);
        assert_eq!(state.speed_string(), "PAUSED");
        state.cursor.paused = false;
        state.cursor.set_speed(0.5);
        assert_eq!(state.speed_string(), "0.5x");

        state.cursor.current_frame = 64 * 75;
        assert_eq!(state.time_string(&clock(64 * 120 + 1), 3), "Round 3  1:15 / 2:00");
    }
}
