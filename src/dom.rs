use crate::constants::{effective_pixel_ratio, HIDDEN_CLASS};
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Typed `getElementById`; `None` when missing or of another element type.
pub fn by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Attach a click handler that lives as long as the page.
#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::debug!("[dom] no #{element_id} to wire");
    }
}

pub fn set_hidden(el: &web::Element, hidden: bool) {
    let cl = el.class_list();
    if hidden {
        _ = cl.add_1(HIDDEN_CLASS);
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "display:none");
    } else {
        _ = cl.remove_1(HIDDEN_CLASS);
        _ = el.set_attribute("style", "");
    }
}

pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| effective_pixel_ratio(w.device_pixel_ratio()))
        .unwrap_or(1.0)
}

/// Match the canvas backing store to `css_w x css_h` CSS pixels at the device
/// pixel ratio. Returns the ratio so callers can scale their transform.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, css_w: f32, css_h: f32) -> f64 {
    let dpr = device_pixel_ratio();
    let w_px = ((css_w as f64 * dpr) as u32).max(1);
    let h_px = ((css_h as f64 * dpr) as u32).max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    dpr
}
