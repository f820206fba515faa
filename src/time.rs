//! Tick clock for frame-driven simulation stepping.
//!
//! The rendering host invokes one tick per presented frame. The clock
//! measures real frame deltas and converts them into the normalized
//! tick unit the steppers integrate with: one unit per frame at 60 Hz,
//! so motion is independent of the host's actual refresh rate.
//!
//! # Example
//!
//! ```ignore
//! use fluxsim::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! time.update();
//!
//! println!("Elapsed: {:.2}s", time.elapsed());
//! println!("Tick delta: {:.3}", time.tick_delta());
//! ```

use std::time::{Duration, Instant};

/// Frames per second the normalized tick unit is defined against.
pub const TICK_RATE: f32 = 60.0;

/// Frame clock with pause support and an optional fixed delta.
///
/// A fixed delta makes stepping deterministic, which the scenario tests
/// rely on; real frame timing is the default for interactive hosts.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// When the previous tick occurred.
    last_tick: Instant,
    /// Total unpaused time in seconds.
    elapsed_secs: f32,
    /// Seconds between the two most recent ticks.
    delta_secs: f32,
    /// Ticks since start.
    tick_count: u64,
    /// Whether the clock is paused.
    paused: bool,
    /// Accumulated time spent paused.
    pause_elapsed: Duration,
    /// Fixed per-tick delta in seconds, if set.
    fixed_delta: Option<f32>,
}

impl Time {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            tick_count: 0,
            paused: false,
            pause_elapsed: Duration::ZERO,
            fixed_delta: None,
        }
    }

    /// Advance the clock. Call once per presented frame.
    ///
    /// Returns `(elapsed, delta)` in seconds for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        let raw_delta = now.duration_since(self.last_tick).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_tick = now;

        let raw_elapsed = now.duration_since(self.start) - self.pause_elapsed;
        self.elapsed_secs = raw_elapsed.as_secs_f32();

        self.tick_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total unpaused seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the two most recent ticks (0 while paused).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// The most recent delta in normalized tick units.
    ///
    /// `1.0` corresponds to one frame at 60 Hz; a host running at 30 Hz
    /// produces `2.0`, so particles cover the same distance per second
    /// regardless of refresh rate.
    #[inline]
    pub fn tick_delta(&self) -> f32 {
        self.delta_secs * TICK_RATE
    }

    /// Ticks since start.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    /// Whether the clock is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the clock.
    ///
    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
        }
    }

    /// Resume after pausing.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_tick);
            self.last_tick = now;
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed per-tick delta instead of measured frame time.
    ///
    /// Pass `None` to return to real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Reset the clock to its initial state.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.tick_count = 0;
        self.paused = false;
        self.pause_elapsed = Duration::ZERO;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
