// Shared host-side doubles for the browser pieces: a canvas that records draw
// calls and a frame scheduler driven by hand.

#![allow(dead_code)]

use divot_core::canvas::{Canvas, Glow, Rect, Rgba, Stroke, TextStyle, Viewport};
use divot_core::frame_loop::{FrameHandle, FrameScheduler};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Cmd {
    Resize(Viewport),
    Clear,
    FillRect(Rect, Rgba),
    Line(Vec2, Vec2, Stroke),
    Circle(Vec2, f32, Rgba, Option<Glow>),
    Text(String, Vec2, TextStyle),
}

pub struct RecordingCanvas {
    pub container: Viewport,
    pub size: Option<Viewport>,
    pub cmds: Vec<Cmd>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            container: Viewport::new(width, height),
            size: None,
            cmds: Vec::new(),
        }
    }

    pub fn lines(&self) -> Vec<(Vec2, Vec2, Stroke)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Line(a, b, s) => Some((*a, *b, *s)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Vec2, f32, Rgba, Option<Glow>)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Circle(p, r, col, g) => Some((*p, *r, *col, *g)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Text(t, _, _) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn container_size(&self) -> Viewport {
        self.container
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = Some(viewport);
        self.cmds.clear();
        self.cmds.push(Cmd::Resize(viewport));
    }

    fn clear(&mut self) {
        self.cmds.push(Cmd::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.cmds.push(Cmd::FillRect(rect, color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.cmds.push(Cmd::Line(from, to, stroke));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>) {
        self.cmds.push(Cmd::Circle(center, radius, color, glow));
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: TextStyle) {
        self.cmds.push(Cmd::Text(text.to_string(), at, style));
    }
}

#[derive(Default)]
pub struct ClockState {
    next: i32,
    pub pending: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub refuse: bool,
}

/// Hand-cranked stand-in for `requestAnimationFrame`.
#[derive(Clone, Default)]
pub struct ManualClock(pub Rc<RefCell<ClockState>>);

impl ManualClock {
    /// Take every outstanding request, as the browser does on a refresh.
    pub fn take_due(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.0.borrow_mut().pending)
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().pending.len()
    }

    pub fn cancelled(&self) -> usize {
        self.0.borrow().cancelled.len()
    }
}

impl FrameScheduler for ManualClock {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut s = self.0.borrow_mut();
        if s.refuse {
            return None;
        }
        s.next += 1;
        let h = FrameHandle(s.next);
        s.pending.push(h);
        Some(h)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut s = self.0.borrow_mut();
        s.pending.retain(|h| *h != handle);
        s.cancelled.push(handle);
    }
}
