//! # Render Loop
//!
//! Drives the engine one tick at a time:
//!
//! 1. drain host events queued since the last tick and apply them,
//! 2. sample the frame clock,
//! 3. animate, update camera controls, refresh the projection, draw,
//! 4. wait for the scheduler before the next tick.
//!
//! Ticks never overlap. Cancellation is cooperative: the flag is checked when
//! a tick starts and again when it finishes, so the tick in flight always
//! completes and no further tick starts. A loop that was cancelled stays
//! cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::engine::{Engine, EngineError};
use crate::foundation::time::{FrameClock, Timer};
use crate::render::backend::RenderBackend;

/// Lifecycle of a render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, no tick has run
    Idle,
    /// Ticking
    Running,
    /// Stopped for good
    Cancelled,
}

/// Host input forwarded to the loop
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    /// Surface size or pixel ratio changed
    Resize {
        /// Width in logical pixels
        width: u32,
        /// Height in logical pixels
        height: u32,
        /// Pixel ratio reported by the platform
        pixel_ratio: f32,
    },
    /// Move a panel slider
    SetNumber {
        /// Folder name
        folder: String,
        /// Control label
        label: String,
        /// Requested value
        value: f32,
    },
    /// Set or flip a panel checkbox
    Toggle {
        /// Folder name
        folder: String,
        /// Control label
        label: String,
        /// New value, or `None` to flip
        value: Option<bool>,
    },
    /// Expand a panel folder
    OpenFolder(String),
    /// Collapse a panel folder
    CloseFolder(String),
    /// Orbit the camera
    Orbit {
        /// Horizontal input
        dx: f32,
        /// Vertical input
        dy: f32,
    },
    /// Log the panel contents
    DescribePanel,
    /// Stop the loop after the current tick
    Cancel,
}

/// Shared cancellation flag
///
/// Clones observe the same flag, so the host can keep one while the loop
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Waits for the next display refresh
pub trait FrameScheduler {
    /// Block until the next tick may start
    fn wait_for_next_frame(&mut self);
}

/// Paces ticks to a fixed rate by sleeping
#[derive(Debug, Clone)]
pub struct FixedRateScheduler {
    frame_time: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRateScheduler {
    /// Scheduler targeting `fps` ticks per second
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            next_deadline: None,
        }
    }

    /// Time budget per tick
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now) + self.frame_time;
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next_deadline = Some(deadline);
        } else {
            // Fell behind; don't try to catch up with a burst of ticks
            self.next_deadline = Some(now);
        }
    }
}

/// Starts the next tick right away
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn wait_for_next_frame(&mut self) {}
}

/// Totals reported when a loop stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSummary {
    /// Ticks completed
    pub frames: u64,
    /// Ticks whose frame the backend failed to draw
    pub dropped_frames: u64,
    /// Clock reading at the last tick
    pub elapsed: f32,
}

/// Tick driver over an [`Engine`]
pub struct RenderLoop<C: FrameClock, S: FrameScheduler> {
    state: LoopState,
    clock: C,
    scheduler: S,
    timer: Timer,
    events: Option<Receiver<LoopEvent>>,
    cancel: CancelToken,
    max_frames: Option<u64>,
    frames: u64,
    dropped_frames: u64,
    elapsed: f32,
}

impl<C: FrameClock, S: FrameScheduler> RenderLoop<C, S> {
    /// Idle loop reading time from `clock` and pacing with `scheduler`
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            state: LoopState::Idle,
            clock,
            scheduler,
            timer: Timer::new(),
            events: None,
            cancel: CancelToken::new(),
            max_frames: None,
            frames: 0,
            dropped_frames: 0,
            elapsed: 0.0,
        }
    }

    /// Drain host events from `events` at the start of each tick
    #[must_use]
    pub fn with_events(mut self, events: Receiver<LoopEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Observe `cancel` instead of a fresh token
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stop after `max_frames` ticks
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Handle that cancels this loop
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Ticks completed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Ticks whose frame was dropped
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Frame timing statistics
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Totals so far
    pub fn summary(&self) -> LoopSummary {
        LoopSummary {
            frames: self.frames,
            dropped_frames: self.dropped_frames,
            elapsed: self.elapsed,
        }
    }

    /// Move from `Idle` to `Running` and start the clock
    ///
    /// Starting a running loop does nothing. A cancelled loop cannot be
    /// restarted.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            LoopState::Idle => {
                self.clock.start();
                self.state = LoopState::Running;
                log::info!("Render loop started");
                Ok(())
            }
            LoopState::Running => Ok(()),
            LoopState::Cancelled => Err(EngineError::LoopCancelled),
        }
    }

    /// Run one tick; returns `false` without doing anything unless running
    ///
    /// A cancellation requested since the previous tick stops the loop here,
    /// before any event is applied or frame drawn.
    pub fn tick<B: RenderBackend>(&mut self, engine: &mut Engine<B>) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        if self.cancel.is_cancelled() {
            self.stop();
            return false;
        }

        self.drain_events(engine);

        let elapsed = self.clock.elapsed_secs().max(self.elapsed);
        self.elapsed = elapsed;
        self.timer.tick(elapsed);

        match engine.frame(elapsed) {
            Ok(stats) => log::trace!(
                "Tick {} at {:.3}s: {} draws",
                self.frames + 1,
                elapsed,
                stats.draw_calls
            ),
            Err(e) => {
                self.dropped_frames += 1;
                log::error!("Frame {} dropped: {}", self.frames + 1, e);
            }
        }
        self.frames += 1;

        if self.max_frames.is_some_and(|max| self.frames >= max) {
            self.cancel.cancel();
        }
        if self.cancel.is_cancelled() {
            self.stop();
        }
        true
    }

    fn stop(&mut self) {
        self.state = LoopState::Cancelled;
        log::info!(
            "Render loop stopped after {} frames ({} dropped, {:.1} fps)",
            self.frames,
            self.dropped_frames,
            self.timer.average_fps()
        );
    }

    /// Start the loop and tick until cancelled
    pub fn run<B: RenderBackend>(&mut self, engine: &mut Engine<B>) -> Result<LoopSummary, EngineError> {
        self.start()?;
        while self.tick(engine) {
            if self.state != LoopState::Running {
                break;
            }
            self.scheduler.wait_for_next_frame();
        }
        Ok(self.summary())
    }

    fn drain_events<B: RenderBackend>(&mut self, engine: &mut Engine<B>) {
        let Some(events) = &self.events else {
            return;
        };
        let mut closed = false;
        loop {
            match events.try_recv() {
                Ok(LoopEvent::Cancel) => {
                    log::info!("Cancel requested");
                    self.cancel.cancel();
                }
                Ok(event) => {
                    if let Err(e) = engine.handle_event(event) {
                        log::warn!("Ignoring host event: {e}");
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Host event channel closed");
                    closed = true;
                    break;
                }
            }
        }
        if closed {
            self.events = None;
        }
    }
}
