use crate::chat::Chat;
use crate::constants::{
    info_button_id, info_close_id, info_overlay_id, panel_subtitle_id, panel_title_id,
    CHAT_CLOSE_ID, CHAT_DRAWER_ID, CHAT_TOGGLE_ID, OPEN_CLASS,
};
use crate::dom;
use divot_core::shell::{PanelId, ShellAction, ShellState};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Shell state shared by the click and key handlers.
#[derive(Clone)]
pub struct Shell {
    document: web::Document,
    state: Rc<RefCell<ShellState>>,
    chat: Option<Rc<Chat>>,
}

impl Shell {
    pub fn new(document: &web::Document, chat: Option<Rc<Chat>>) -> Self {
        Self {
            document: document.clone(),
            state: Rc::new(RefCell::new(ShellState::default())),
            chat,
        }
    }

    pub fn state(&self) -> ShellState {
        *self.state.borrow()
    }

    pub fn dispatch(&self, action: ShellAction) {
        let before = self.state();
        self.state.borrow_mut().apply(action);
        let after = self.state();
        sync(&self.document, &after);
        if after.chat_open && !before.chat_open {
            if let Some(chat) = &self.chat {
                chat.focus_input();
            }
        }
        log::debug!("[shell] {:?} -> {:?}", action, after);
    }
}

/// Fill panel headings and info overlay copy.
pub fn populate(document: &web::Document) {
    for panel in PanelId::ALL {
        let l = panel.letter();
        dom::set_text(document, &panel_title_id(l), panel.heading());
        dom::set_text(document, &panel_subtitle_id(l), panel.subtitle());
        let info = panel.info();
        if let Some(overlay) = document.get_element_by_id(&info_overlay_id(l)) {
            if let Ok(Some(title)) = overlay.query_selector("h3") {
                title.set_text_content(Some(info.title));
            }
            if let Ok(Some(body)) = overlay.query_selector("p") {
                body.set_text_content(Some(info.text));
            }
        }
    }
}

/// Make overlay and drawer visibility match `state`.
pub fn sync(document: &web::Document, state: &ShellState) {
    for panel in PanelId::ALL {
        if let Some(el) = document.get_element_by_id(&info_overlay_id(panel.letter())) {
            dom::set_hidden(&el, !state.is_info_open(panel));
        }
    }
    if let Some(drawer) = document.get_element_by_id(CHAT_DRAWER_ID) {
        let cl = drawer.class_list();
        if state.chat_open {
            _ = cl.add_1(OPEN_CLASS);
        } else {
            _ = cl.remove_1(OPEN_CLASS);
        }
        _ = drawer.set_attribute("aria-hidden", if state.chat_open { "false" } else { "true" });
    }
}

pub fn wire_buttons(shell: &Shell) {
    let document = &shell.document;
    for panel in PanelId::ALL {
        let l = panel.letter();
        let s = shell.clone();
        dom::add_click_listener(document, &info_button_id(l), move || {
            s.dispatch(ShellAction::OpenInfo(panel))
        });
        let s = shell.clone();
        dom::add_click_listener(document, &info_close_id(l), move || {
            s.dispatch(ShellAction::CloseInfo)
        });
    }
    let s = shell.clone();
    dom::add_click_listener(document, CHAT_TOGGLE_ID, move || {
        s.dispatch(ShellAction::ToggleChat)
    });
    let s = shell.clone();
    dom::add_click_listener(document, CHAT_CLOSE_ID, move || {
        s.dispatch(ShellAction::CloseChat)
    });
    sync(document, &shell.state());
}
