//! Frame cursor and timed auto-advance.
//!
//! The sequencer owns no timer thread. The host calls [`Playback::tick`] from
//! its event loop (animation frame, interval callback, ...), and the cursor
//! advances once per elapsed interval.

use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default delay between auto-advanced frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(800);

/// Outcome of a playback tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackTick {
    /// Not playing, or the interval has not elapsed yet.
    Idle,
    /// The cursor moved to this frame and playback continues.
    Advanced(usize),
    /// The cursor moved onto the last frame and playback stopped.
    Finished(usize),
    /// Playback stopped without moving (already on the last frame).
    Stopped,
}

/// Cursor into a frame sequence plus play/pause state.
#[derive(Debug, Clone)]
pub struct Playback {
    cursor: usize,
    playing: bool,
    interval: Duration,
    last_advance: Option<Instant>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            cursor: 0,
            playing: false,
            interval,
            last_advance: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pull the cursor back into `0..len` after the sequence shrank.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Jump to a frame. Returns true if the cursor moved.
    pub fn seek(&mut self, index: usize, len: usize) -> bool {
        let target = index.min(len.saturating_sub(1));
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Step back one frame, stopping at the first. Leaves the timer alone.
    pub fn prev(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one frame, stopping at the last. Leaves the timer alone.
    pub fn next(&mut self, len: usize) -> bool {
        if self.cursor + 1 >= len {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Start auto-advancing. Starting from the last frame rewinds to the first.
    /// A single-frame sequence has nothing to play.
    pub fn play(&mut self, now: Instant, len: usize) -> bool {
        if len <= 1 || self.playing {
            return false;
        }
        if self.cursor + 1 >= len {
            self.cursor = 0;
        }
        self.playing = true;
        self.last_advance = Some(now);
        true
    }

    /// Stop auto-advancing. Returns true if playback was running.
    pub fn pause(&mut self) -> bool {
        let was_playing = self.playing;
        self.playing = false;
        self.last_advance = None;
        was_playing
    }

    /// Advance by one frame if playing and the interval has elapsed since the
    /// last advance.
    pub fn tick(&mut self, now: Instant, len: usize) -> PlaybackTick {
        if !self.playing {
            return PlaybackTick::Idle;
        }
        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return PlaybackTick::Idle;
        };
        if now.saturating_duration_since(last) < self.interval {
            return PlaybackTick::Idle;
        }

        if self.cursor + 1 >= len {
            self.pause();
            return PlaybackTick::Stopped;
        }

        self.cursor += 1;
        self.last_advance = Some(now);
        if self.cursor + 1 >= len {
            self.pause();
            PlaybackTick::Finished(self.cursor)
        } else {
            PlaybackTick::Advanced(self.cursor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(800);

    #[test]
    fn test_manual_navigation_clamps() {
        let mut playback = Playback::new();
        assert!(!playback.prev());
        assert!(playback.next(3));
        assert!(playback.next(3));
        assert!(!playback.next(3));
        assert_eq!(playback.cursor(), 2);
        assert!(playback.prev());
        assert_eq!(playback.cursor(), 1);
    }

    #[test]
    fn test_single_frame_cannot_play() {
        let mut playback = Playback::new();
        assert!(!playback.play(Instant::now(), 1));
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let start = Instant::now();
        let mut playback = Playback::new();
        assert!(playback.play(start, 3));
        assert_eq!(playback.tick(start + Duration::from_millis(799), 3), PlaybackTick::Idle);
        assert_eq!(playback.tick(start + STEP, 3), PlaybackTick::Advanced(1));
        assert_eq!(playback.tick(start + STEP + Duration::from_millis(10), 3), PlaybackTick::Idle);
    }

    #[test]
    fn test_stops_at_last_frame() {
        let start = Instant::now();
        let mut playback = Playback::new();
        playback.play(start, 3);
        assert_eq!(playback.tick(start + STEP, 3), PlaybackTick::Advanced(1));
        assert_eq!(playback.tick(start + STEP * 2, 3), PlaybackTick::Finished(2));
        assert!(!playback.is_playing());
        // No further stop events once stopped
        assert_eq!(playback.tick(start + STEP * 3, 3), PlaybackTick::Idle);
        assert_eq!(playback.cursor(), 2);
    }

    #[test]
    fn test_play_from_last_frame_rewinds() {
        let mut playback = Playback::new();
        playback.seek(4, 3);
        assert_eq!(playback.cursor(), 2);
        assert!(playback.play(Instant::now(), 3));
        assert_eq!(playback.cursor(), 0);
    }

    #[test]
    fn test_manual_step_keeps_timer() {
        let start = Instant::now();
        let mut playback = Playback::new();
        playback.play(start, 4);
        playback.next(4);
        // The timer still fires relative to play(), not to the manual step
        assert_eq!(playback.tick(start + STEP, 4), PlaybackTick::Advanced(2));
    }

    #[test]
    fn test_manual_jump_to_end_stops_on_next_tick() {
        let start = Instant::now();
        let mut playback = Playback::new();
        playback.play(start, 3);
        playback.seek(2, 3);
        assert!(playback.is_playing());
        assert_eq!(playback.tick(start + STEP, 3), PlaybackTick::Stopped);
        assert_eq!(playback.tick(start + STEP * 2, 3), PlaybackTick::Idle);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut playback = Playback::new();
        playback.seek(3, 4);
        playback.clamp(2);
        assert_eq!(playback.cursor(), 1);
    }
}
