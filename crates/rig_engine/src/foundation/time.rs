//! Time management utilities

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of elapsed seconds since the render loop started
///
/// Implementations must be monotonic: a later read never returns a smaller
/// value than an earlier one.
pub trait FrameClock {
    /// Start (or restart) counting from zero
    fn start(&mut self);

    /// Seconds elapsed since `start`
    fn elapsed_secs(&self) -> f32;
}

/// Wall-clock backed by `Instant`, which is monotonic by construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    started: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock that starts counting now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn start(&mut self) {
        self.started = Instant::now();
    }

    fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

/// Synthetic clock advanced by hand
///
/// Clones share the same time value, so a test can keep one handle while the
/// render loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    /// Create a clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`; negative deltas are ignored
    pub fn advance(&self, seconds: f32) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    /// Jump to an absolute time; jumps backwards are ignored
    pub fn set(&self, seconds: f32) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }
}

impl FrameClock for ManualClock {
    fn start(&mut self) {
        self.now.set(0.0);
    }

    fn elapsed_secs(&self) -> f32 {
        self.now.get()
    }
}

/// Per-frame statistics derived from successive elapsed-time samples
#[derive(Debug, Clone, Default)]
pub struct Timer {
    last_sample: f32,
    delta_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `elapsed` seconds (should be called once per frame)
    pub fn tick(&mut self, elapsed: f32) {
        self.delta_time = (elapsed - self.last_sample).max(0.0);
        self.last_sample = elapsed;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the first sample
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.last_sample > 0.0 {
            self.frame_count as f32 / self.last_sample
        } else {
            0.0
        }
    }
}
