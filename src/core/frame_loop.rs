//! Run/stop state of the redraw loop
//!
//! The browser layer owns the actual `requestAnimationFrame` closure; this
//! type decides whether a frame may draw and which handle must be
//! cancelled on teardown. Handles are generic so tests can use plain
//! integers.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop<H> {
    state: LoopState,
    pending: Option<H>,
    start: f64,
    frames: u64,
}

impl<H> FrameLoop<H> {
    /// New loop, running, with `start` as time zero (seconds)
    pub fn new(start: f64) -> Self {
        Self {
            state: LoopState::Running,
            pending: None,
            start,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record the handle of the next requested frame.
    /// Returns false if the loop was stopped meanwhile; the caller must
    /// cancel that request itself.
    pub fn schedule(&mut self, handle: H) -> bool {
        if !self.is_running() {
            return false;
        }
        self.pending = Some(handle);
        true
    }

    /// A frame callback fired. Returns elapsed seconds if it should draw.
    pub fn begin_frame(&mut self, now: f64) -> Option<f32> {
        // The handle that just fired is spent
        self.pending = None;
        if !self.is_running() {
            return None;
        }
        self.frames += 1;
        Some((now - self.start).max(0.0) as f32)
    }

    /// Stop the loop. Yields the pending handle exactly once; later calls
    /// return None so teardown can run any number of times.
    pub fn stop(&mut self) -> Option<H> {
        self.state = LoopState::Stopped;
        self.pending.take()
    }
}
