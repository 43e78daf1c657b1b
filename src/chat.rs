use crate::constants::{
    ASSISTANT_BUBBLE_CLASS, CHAT_INDICATOR_ID, CHAT_INPUT_ID, CHAT_MESSAGES_ID, CHAT_SEND_ID,
    USER_BUBBLE_CLASS,
};
use crate::dom;
use crate::gemini::GeminiClient;
use divot_core::chat::{transcript_updates, ChatSession, Sender, TranscriptUpdate};
use divot_core::shell::is_submit_key;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// DOM side of the chat drawer. Bubbles are appended as messages arrive; only
/// the newest one is ever rewritten.
struct ChatView {
    document: web::Document,
    messages: web::Element,
    input: web::HtmlInputElement,
    send: web::HtmlButtonElement,
    indicator: Option<web::Element>,
    bubbles: RefCell<Vec<web::Element>>,
}

impl ChatView {
    fn render(&self, session: &ChatSession) {
        let mut bubbles = self.bubbles.borrow_mut();
        for update in transcript_updates(session.messages(), bubbles.len()) {
            match update {
                TranscriptUpdate::Rewrite(msg) => {
                    if let Some(el) = bubbles.last() {
                        el.set_text_content(Some(&msg.text));
                    }
                }
                TranscriptUpdate::Append(msg) => {
                    let Ok(el) = self.document.create_element("div") else {
                        break;
                    };
                    el.set_class_name(match msg.sender {
                        Sender::User => USER_BUBBLE_CLASS,
                        Sender::Assistant => ASSISTANT_BUBBLE_CLASS,
                    });
                    el.set_text_content(Some(&msg.text));
                    _ = self.messages.append_child(&el);
                    bubbles.push(el);
                }
            }
        }
        self.messages.set_scroll_top(self.messages.scroll_height());
        drop(bubbles);
        self.sync_controls(session);
    }

    fn sync_controls(&self, session: &ChatSession) {
        self.send
            .set_disabled(!session.can_send(&self.input.value()));
        if let Some(ind) = &self.indicator {
            dom::set_hidden(ind, !session.is_streaming());
        }
    }
}

pub struct Chat {
    session: RefCell<ChatSession>,
    service: GeminiClient,
    view: ChatView,
}

impl Chat {
    pub fn focus_input(&self) {
        _ = self.view.input.focus();
    }

    /// Send the current input. Ignored while a reply is streaming.
    fn submit(self: &Rc<Self>) {
        let text = self.view.input.value();
        if !self.session.borrow().can_send(&text) {
            return;
        }
        self.view.input.set_value("");
        let this = Rc::clone(self);
        spawn_local(async move {
            let outcome = divot_core::chat::send(&this.session, &this.service, &text, |s| {
                this.view.render(s)
            })
            .await;
            log::debug!("[chat] send finished: {:?}", outcome);
        });
    }
}

/// Wire the chat drawer. `None` when the page lacks the chat elements.
pub fn mount(document: &web::Document, greeting: &str, service: GeminiClient) -> Option<Rc<Chat>> {
    let view = ChatView {
        document: document.clone(),
        messages: document.get_element_by_id(CHAT_MESSAGES_ID)?,
        input: dom::by_id(document, CHAT_INPUT_ID)?,
        send: dom::by_id(document, CHAT_SEND_ID)?,
        indicator: document.get_element_by_id(CHAT_INDICATOR_ID),
        bubbles: RefCell::new(Vec::new()),
    };
    let chat = Rc::new(Chat {
        session: RefCell::new(ChatSession::with_greeting(greeting)),
        service,
        view,
    });
    chat.view.render(&chat.session.borrow());

    let c = chat.clone();
    dom::add_click_listener(document, CHAT_SEND_ID, move || c.submit());

    let c = chat.clone();
    let on_key = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if is_submit_key(&ev.key(), ev.shift_key()) {
            ev.prevent_default();
            c.submit();
        }
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    _ = chat
        .view
        .input
        .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
    on_key.forget();

    let c = chat.clone();
    let on_input = Closure::wrap(Box::new(move || {
        c.view.sync_controls(&c.session.borrow());
    }) as Box<dyn FnMut()>);
    _ = chat
        .view
        .input
        .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref());
    on_input.forget();

    log::info!("[chat] ready");
    Some(chat)
}
