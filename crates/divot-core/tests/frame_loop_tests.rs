mod common;

use common::{ManualClock, RecordingCanvas};
use divot_core::canvas::Canvas;
use divot_core::frame_loop::{LoopState, RenderLoop, Renderer};
use std::cell::Cell;
use std::rc::Rc;

/// Counts frames through a shared cell so the count survives the loop.
struct Counting(Rc<Cell<u32>>);

impl Renderer for Counting {
    fn render_frame(&mut self, _canvas: &mut dyn Canvas) {
        self.0.set(self.0.get() + 1);
    }
}

fn pump(lp: &mut RenderLoop<Counting, RecordingCanvas, ManualClock>, clock: &ManualClock) {
    for _ in clock.take_due() {
        lp.on_frame();
    }
}

fn setup() -> (
    RenderLoop<Counting, RecordingCanvas, ManualClock>,
    ManualClock,
    Rc<Cell<u32>>,
) {
    let count = Rc::new(Cell::new(0));
    let clock = ManualClock::default();
    let lp = RenderLoop::new(
        Counting(count.clone()),
        RecordingCanvas::new(100.0, 100.0),
        clock.clone(),
    );
    (lp, clock, count)
}

#[test]
fn idle_loop_draws_nothing() {
    let (mut lp, clock, count) = setup();
    assert_eq!(lp.state(), LoopState::Idle);
    assert!(!lp.on_frame());
    assert_eq!(count.get(), 0);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn start_draws_immediately_and_keeps_one_request_outstanding() {
    let (mut lp, clock, count) = setup();
    lp.start();
    assert_eq!(count.get(), 1);
    assert_eq!(clock.pending(), 1);
    for _ in 0..5 {
        pump(&mut lp, &clock);
        assert_eq!(clock.pending(), 1);
    }
    assert_eq!(count.get(), 6);
    assert_eq!(lp.frames(), 6);
}

#[test]
fn starting_twice_does_not_double_the_loop() {
    let (mut lp, clock, count) = setup();
    lp.start();
    lp.start();
    assert_eq!(count.get(), 1);
    assert_eq!(clock.pending(), 1);
}

#[test]
fn stop_cancels_pending_frame_and_counter_freezes() {
    let (mut lp, clock, count) = setup();
    lp.start();
    pump(&mut lp, &clock);
    pump(&mut lp, &clock);
    let at_stop = count.get();

    lp.stop();
    assert_eq!(lp.state(), LoopState::Stopped);
    assert_eq!(clock.pending(), 0);
    assert_eq!(clock.cancelled(), 1);

    for _ in 0..10 {
        pump(&mut lp, &clock);
    }
    assert_eq!(count.get(), at_stop);
}

#[test]
fn stale_callback_after_stop_is_ignored() {
    let (mut lp, clock, count) = setup();
    lp.start();
    lp.stop();
    // A host that fires a callback it was asked to cancel
    assert!(!lp.on_frame());
    assert_eq!(count.get(), 1);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn dropping_the_loop_cancels_its_frame() {
    let (mut lp, clock, count) = setup();
    lp.start();
    pump(&mut lp, &clock);
    drop(lp);
    assert_eq!(clock.pending(), 0);
    assert_eq!(clock.cancelled(), 1);
    assert_eq!(count.get(), 2);
}

#[test]
fn stop_then_drop_cancels_once() {
    let (mut lp, clock, _count) = setup();
    lp.start();
    lp.stop();
    drop(lp);
    assert_eq!(clock.cancelled(), 1);
}

#[test]
fn refused_request_leaves_no_pending_handle() {
    let (mut lp, clock, count) = setup();
    clock.0.borrow_mut().refuse = true;
    lp.start();
    assert_eq!(count.get(), 1);
    assert_eq!(lp.state(), LoopState::Running { pending: None });
    lp.stop();
    assert_eq!(clock.cancelled(), 0);
}

#[test]
fn two_loops_are_independent() {
    let (mut a, clock_a, count_a) = setup();
    let (mut b, clock_b, count_b) = setup();
    a.start();
    b.start();
    pump(&mut a, &clock_a);
    a.stop();
    pump(&mut b, &clock_b);
    pump(&mut b, &clock_b);
    assert_eq!(count_a.get(), 2);
    assert_eq!(count_b.get(), 3);
    assert_eq!(clock_b.pending(), 1);
}
