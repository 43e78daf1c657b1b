use crate::render::CanvasSurface;
use divot_core::ChartPanel;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A static chart, redrawn when the window resizes or the pointer moves over it.
pub struct MountedChart {
    window: web::Window,
    canvas: web::HtmlCanvasElement,
    on_resize: Closure<dyn FnMut()>,
    on_move: Closure<dyn FnMut(web::MouseEvent)>,
    on_leave: Closure<dyn FnMut()>,
}

impl Drop for MountedChart {
    fn drop(&mut self) {
        _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        );
        _ = self.canvas.remove_event_listener_with_callback(
            "mousemove",
            self.on_move.as_ref().unchecked_ref(),
        );
        _ = self.canvas.remove_event_listener_with_callback(
            "mouseleave",
            self.on_leave.as_ref().unchecked_ref(),
        );
    }
}

pub fn mount(panel: ChartPanel, canvas: web::HtmlCanvasElement) -> Option<MountedChart> {
    let Some(surface) = CanvasSurface::new(canvas.clone()) else {
        log::debug!("[charts] {panel:?}: no 2d context");
        return None;
    };
    let window = web::window()?;
    let surface = Rc::new(RefCell::new(surface));
    let pointer: Rc<Cell<Option<Vec2>>> = Rc::new(Cell::new(None));
    let redraw = {
        let surface = surface.clone();
        let pointer = pointer.clone();
        Rc::new(move || panel.draw_with_pointer(&mut *surface.borrow_mut(), pointer.get()))
    };
    redraw();

    let r = redraw.clone();
    let on_resize = Closure::wrap(Box::new(move || r()) as Box<dyn FnMut()>);
    _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());

    // offsetX/Y are CSS pixels, the same space the surface draws in
    let (r, p) = (redraw.clone(), pointer.clone());
    let on_move = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        p.set(Some(Vec2::new(ev.offset_x() as f32, ev.offset_y() as f32)));
        r();
    }) as Box<dyn FnMut(web::MouseEvent)>);
    _ = canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());

    let (r, p) = (redraw, pointer);
    let on_leave = Closure::wrap(Box::new(move || {
        p.set(None);
        r();
    }) as Box<dyn FnMut()>);
    _ = canvas.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref());

    Some(MountedChart {
        window,
        canvas,
        on_resize,
        on_move,
        on_leave,
    })
}
