//! Per-frame redraw loop with deterministic teardown.
//!
//! A [`RenderLoop`] owns one renderer, its canvas and a [`FrameScheduler`]. It
//! keeps at most one frame request outstanding, re-requests at the end of each
//! frame, and cancels the outstanding request when stopped or dropped. After
//! that no further frame is rendered even if the host still delivers a stale
//! callback.

use crate::canvas::Canvas;

/// Something that draws one frame and advances its own animation state.
pub trait Renderer {
    fn render_frame(&mut self, canvas: &mut dyn Canvas);
}

/// Identifier returned by the host when a frame is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Display-refresh scheduler (`requestAnimationFrame` in the browser).
pub trait FrameScheduler {
    /// Ask for one callback at the next refresh. `None` when the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running { pending: Option<FrameHandle> },
    Stopped,
}

pub struct RenderLoop<R, C, S>
where
    R: Renderer,
    C: Canvas,
    S: FrameScheduler,
{
    renderer: R,
    canvas: C,
    scheduler: S,
    state: LoopState,
    frames: u64,
}

impl<R, C, S> RenderLoop<R, C, S>
where
    R: Renderer,
    C: Canvas,
    S: FrameScheduler,
{
    pub fn new(renderer: R, canvas: C, scheduler: S) -> Self {
        Self {
            renderer,
            canvas,
            scheduler,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Idle -> Running. Renders the first frame immediately, then requests the
    /// next one. Has no effect once running or stopped.
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running { pending: None };
        self.render_and_reschedule();
    }

    /// Called by the scheduler's callback. Returns `false` when the loop is not
    /// running and nothing was drawn.
    pub fn on_frame(&mut self) -> bool {
        match self.state {
            LoopState::Running { .. } => {
                self.state = LoopState::Running { pending: None };
                self.render_and_reschedule();
                true
            }
            LoopState::Idle | LoopState::Stopped => false,
        }
    }

    /// Cancel the outstanding request and stop for good.
    pub fn stop(&mut self) {
        if let LoopState::Running {
            pending: Some(handle),
        } = self.state
        {
            self.scheduler.cancel_frame(handle);
        }
        if self.state != LoopState::Stopped {
            log::debug!("[frame] loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    fn render_and_reschedule(&mut self) {
        self.renderer.render_frame(&mut self.canvas);
        self.frames += 1;
        let pending = self.scheduler.request_frame();
        if pending.is_none() {
            log::warn!("[frame] host refused a frame request; loop paused");
        }
        self.state = LoopState::Running { pending };
    }
}

impl<R, C, S> Drop for RenderLoop<R, C, S>
where
    R: Renderer,
    C: Canvas,
    S: FrameScheduler,
{
    fn drop(&mut self) {
        self.stop();
    }
}
