use crate::overlay::Shell;
use divot_core::shell::ShellAction;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Typing in a text field must not trigger the digit shortcuts.
fn is_text_entry(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, shell: &Shell) {
    let key = ev.key();
    if key != "Escape" && is_text_entry(ev) {
        return;
    }
    if let Some(action) = ShellAction::for_key(&key) {
        shell.dispatch(action);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(shell: Shell) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &shell);
            }) as Box<dyn FnMut(web::KeyboardEvent)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
