use crate::render::CanvasSurface;
use divot_core::frame_loop::{FrameHandle, FrameScheduler, RenderLoop, Renderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` bound to one persistent callback.
pub struct RafScheduler {
    window: web::Window,
    callback: js_sys::Function,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.window
            .request_animation_frame(&self.callback)
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        _ = self.window.cancel_animation_frame(handle.0);
    }
}

type LoopSlot<R> = Rc<RefCell<Option<RenderLoop<R, CanvasSurface, RafScheduler>>>>;

/// A running renderer. Dropping it cancels the pending frame and releases the
/// callback; no frame fires afterwards.
pub struct MountedRenderer {
    name: &'static str,
    teardown: Option<Box<dyn FnOnce()>>,
    // Outlives the teardown, which cancels the frame that references it.
    _tick: Closure<dyn FnMut()>,
}

impl Drop for MountedRenderer {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
        log::info!("[frame] {} unmounted", self.name);
    }
}

/// Start `renderer` on `canvas`. Without a 2D context this is a silent no-op
/// and the panel stays blank.
pub fn mount<R: Renderer + 'static>(
    name: &'static str,
    canvas: web::HtmlCanvasElement,
    renderer: R,
) -> Option<MountedRenderer> {
    let Some(surface) = CanvasSurface::new(canvas) else {
        log::debug!("[frame] {name}: no 2d context, not starting");
        return None;
    };
    let window = web::window()?;

    let slot: LoopSlot<R> = Rc::new(RefCell::new(None));
    let weak = Rc::downgrade(&slot);
    let tick = Closure::wrap(Box::new(move || {
        if let Some(slot) = weak.upgrade() {
            if let Some(render_loop) = slot.borrow_mut().as_mut() {
                render_loop.on_frame();
            }
        }
    }) as Box<dyn FnMut()>);

    let scheduler = RafScheduler {
        window,
        callback: tick.as_ref().unchecked_ref::<js_sys::Function>().clone(),
    };
    let mut render_loop = RenderLoop::new(renderer, surface, scheduler);
    render_loop.start();
    *slot.borrow_mut() = Some(render_loop);
    log::info!("[frame] {name} mounted");

    let teardown = Box::new(move || {
        let render_loop = slot.borrow_mut().take();
        drop(render_loop);
    });
    Some(MountedRenderer {
        name,
        teardown: Some(teardown),
        _tick: tick,
    })
}
