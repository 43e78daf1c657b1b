use divot_core::chat::{
    send, transcript_updates, ChatSession, CompletionService, FragmentStream, SendOutcome,
    Sender, TranscriptUpdate, ERROR_NOTICE, GREETING, PERSONA,
};
use divot_core::error::CompletionError;
use futures::channel::mpsc;
use futures::executor::{block_on, LocalPool};
use futures::stream;
use futures::task::LocalSpawnExt;
use futures::StreamExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Replays a fixed list of results and records what it was asked.
struct Scripted {
    items: Vec<Result<String, CompletionError>>,
    calls: Cell<u32>,
    last: RefCell<Option<(String, String)>>,
}

impl Scripted {
    fn new(items: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            items,
            calls: Cell::new(0),
            last: RefCell::new(None),
        }
    }

    fn fragments(parts: &[&str]) -> Self {
        Self::new(parts.iter().map(|p| Ok(p.to_string())).collect())
    }
}

impl CompletionService for Scripted {
    fn open_stream(&self, context: &str, message: &str) -> FragmentStream {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some((context.to_string(), message.to_string()));
        stream::iter(self.items.clone()).boxed_local()
    }
}

/// Stream fed by the test through a channel, so a send can be held open.
struct Channel {
    rx: RefCell<Option<mpsc::UnboundedReceiver<Result<String, CompletionError>>>>,
    calls: Cell<u32>,
}

impl CompletionService for Channel {
    fn open_stream(&self, _context: &str, _message: &str) -> FragmentStream {
        self.calls.set(self.calls.get() + 1);
        match self.rx.borrow_mut().take() {
            Some(rx) => rx.boxed_local(),
            None => stream::empty().boxed_local(),
        }
    }
}

#[test]
fn fragments_are_folded_in_order() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::fragments(&["Hello", " world", "!"]);
    let outcome = block_on(send(&session, &service, "What is a divot?", |_| {}));
    assert_eq!(outcome, SendOutcome::Completed);

    let s = session.borrow();
    let msgs = s.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0].sender, Sender::User);
    assert_eq!(msgs[0].text, "What is a divot?");
    assert_eq!(msgs[1].sender, Sender::Assistant);
    assert_eq!(msgs[1].text, "Hello world!");
    assert!(!s.is_streaming());
}

#[test]
fn request_carries_persona_and_full_user_text() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::fragments(&["ok"]);
    block_on(send(&session, &service, "  explain panel C  ", |_| {}));
    let (context, message) = service.last.borrow().clone().unwrap();
    assert_eq!(context, PERSONA);
    assert_eq!(message, "  explain panel C  ");
    assert!(context.contains("(D) Memory Self-Organization"));
}

#[test]
fn blank_input_is_ignored() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::fragments(&["unused"]);
    for text in ["", "   ", "\n\t"] {
        let outcome = block_on(send(&session, &service, text, |_| {}));
        assert_eq!(outcome, SendOutcome::Rejected);
    }
    assert_eq!(service.calls.get(), 0);
    assert!(session.borrow().messages().is_empty());
}

#[test]
fn immediate_failure_leaves_one_notice_and_an_idle_session() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::new(vec![Err(CompletionError::Network("offline".into()))]);
    let outcome = block_on(send(&session, &service, "hi", |_| {}));
    assert_eq!(outcome, SendOutcome::Failed);

    let s = session.borrow();
    let replies: Vec<_> = s
        .messages()
        .iter()
        .filter(|m| m.sender == Sender::Assistant)
        .collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, ERROR_NOTICE);
    assert!(!s.is_streaming());
    assert!(s.can_send("again"));
}

#[test]
fn failure_mid_stream_keeps_received_text() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::new(vec![
        Ok("Partial".into()),
        Err(CompletionError::Provider {
            code: 429,
            message: "quota".into(),
        }),
        Ok("never seen".into()),
    ]);
    let outcome = block_on(send(&session, &service, "hi", |_| {}));
    assert_eq!(outcome, SendOutcome::Failed);
    let s = session.borrow();
    assert_eq!(s.messages()[1].text, format!("Partial{ERROR_NOTICE}"));
}

#[test]
fn empty_fragments_do_not_trigger_updates() {
    let session = RefCell::new(ChatSession::new());
    let service = Scripted::fragments(&["a", "", "b"]);
    let mut updates = 0;
    block_on(send(&session, &service, "hi", |_| updates += 1));
    // opened, "a", "b", sealed
    assert_eq!(updates, 4);
    assert_eq!(session.borrow().messages()[1].text, "ab");
}

#[test]
fn observer_sees_placeholder_then_growing_text() {
    let session = RefCell::new(ChatSession::with_greeting(GREETING));
    let service = Scripted::fragments(&["Deco", "herence"]);
    let mut seen = Vec::new();
    block_on(send(&session, &service, "hi", |s| {
        seen.push((
            s.messages().last().unwrap().text.clone(),
            s.is_streaming(),
        ))
    }));
    assert_eq!(
        seen,
        vec![
            (String::new(), true),
            ("Deco".to_string(), true),
            ("Decoherence".to_string(), true),
            ("Decoherence".to_string(), false),
        ]
    );
}

#[test]
fn second_send_while_streaming_is_rejected() {
    let (tx, rx) = mpsc::unbounded();
    let service = Rc::new(Channel {
        rx: RefCell::new(Some(rx)),
        calls: Cell::new(0),
    });
    let session = Rc::new(RefCell::new(ChatSession::new()));

    let mut pool = LocalPool::new();
    {
        let session = session.clone();
        let service = service.clone();
        pool.spawner()
            .spawn_local(async move {
                send(&session, &*service, "first", |_| {}).await;
            })
            .unwrap();
    }
    pool.run_until_stalled();
    assert!(session.borrow().is_streaming());

    let outcome = block_on(send(&session, &*service, "second", |_| {}));
    assert_eq!(outcome, SendOutcome::Rejected);
    assert_eq!(service.calls.get(), 1);
    assert_eq!(session.borrow().messages().len(), 2);

    tx.unbounded_send(Ok("Hello".into())).unwrap();
    pool.run_until_stalled();
    tx.unbounded_send(Ok(" world".into())).unwrap();
    tx.unbounded_send(Ok("!".into())).unwrap();
    drop(tx);
    pool.run();

    let s = session.borrow();
    assert!(!s.is_streaming());
    assert_eq!(s.messages()[1].text, "Hello world!");
    assert_eq!(s.messages().len(), 2);
}

#[test]
fn in_progress_reply_is_exposed_while_streaming() {
    let mut s = ChatSession::with_greeting(GREETING);
    assert_eq!(s.messages().len(), 1);
    assert!(s.in_progress().is_none());
    let turn = s.begin("hello").unwrap();
    assert_eq!(s.in_progress().map(|m| m.id), Some(turn.reply));
    assert!(s.begin("again").is_none());
    s.append_fragment("x");
    s.complete();
    assert!(s.in_progress().is_none());
    assert!(!s.append_fragment("late"));
    assert_eq!(s.messages()[2].text, "x");
}

#[test]
fn message_ids_are_unique_and_increasing() {
    let mut s = ChatSession::with_greeting(GREETING);
    for i in 0..3 {
        s.begin(&format!("q{i}")).unwrap();
        s.complete();
    }
    let ids: Vec<_> = s.messages().iter().map(|m| m.id).collect();
    for w in ids.windows(2) {
        assert!(w[0] < w[1]);
    }
}

#[test]
fn blank_greeting_starts_empty() {
    assert!(ChatSession::with_greeting("  ").messages().is_empty());
}

/// Mirrors the browser view: bubbles are only appended or have their newest
/// entry rewritten.
fn apply_updates(bubbles: &mut Vec<(Sender, String)>, session: &ChatSession) {
    for update in transcript_updates(session.messages(), bubbles.len()) {
        match update {
            TranscriptUpdate::Rewrite(m) => {
                if let Some(last) = bubbles.last_mut() {
                    last.1 = m.text.clone();
                }
            }
            TranscriptUpdate::Append(m) => bubbles.push((m.sender, m.text.clone())),
        }
    }
}

#[test]
fn rendered_transcript_shows_user_text_and_streamed_reply() {
    let session = RefCell::new(ChatSession::with_greeting(GREETING));
    let mut bubbles = Vec::new();
    apply_updates(&mut bubbles, &session.borrow());

    let service = Scripted::fragments(&["Hello", " world", "!"]);
    block_on(send(&session, &service, "hi", |s| apply_updates(&mut bubbles, s)));

    assert_eq!(
        bubbles,
        [
            (Sender::Assistant, GREETING.to_string()),
            (Sender::User, "hi".to_string()),
            (Sender::Assistant, "Hello world!".to_string()),
        ]
    );
}

#[test]
fn transcript_updates_append_new_messages_with_text() {
    let mut session = ChatSession::with_greeting(GREETING);
    session.begin("what is ρ?").unwrap();
    let msgs = session.messages();

    let updates = transcript_updates(msgs, 1);
    assert_eq!(
        updates,
        [
            TranscriptUpdate::Rewrite(&msgs[0]),
            TranscriptUpdate::Append(&msgs[1]),
            TranscriptUpdate::Append(&msgs[2]),
        ]
    );
    match updates[1] {
        TranscriptUpdate::Append(m) => assert_eq!(m.text, "what is ρ?"),
        other => panic!("unexpected {other:?}"),
    }

    // Caught up: only the newest bubble is touched
    assert_eq!(transcript_updates(msgs, 3), [TranscriptUpdate::Rewrite(&msgs[2])]);
    assert!(transcript_updates(msgs, 4).is_empty());
    assert!(transcript_updates(&[], 0).is_empty());
}
