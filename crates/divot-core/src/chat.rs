//! Chat transcript and the single-flight streaming send.
//!
//! A send appends the user's message and an empty assistant placeholder, opens
//! one completion stream, and folds each fragment into the placeholder in
//! arrival order. While that placeholder is in progress every other send is
//! ignored. Failures never escape: they become a fixed notice in the
//! transcript.

use crate::error::CompletionError;
use chrono::{DateTime, Utc};
use futures_util::stream::{LocalBoxStream, StreamExt};
use std::cell::RefCell;

/// System instruction sent with every question.
pub const PERSONA: &str = "You are a Quantum Physics and Neuroscience expert specializing in \"Divot Theory\".
You interpret data visualizations related to memory formation, quantum phase fields, and entropy.

The user is looking at a dashboard with 4 panels:
1. (A) \"Tiled Valley\" Topology: A 3D surface representing a Quantum Phase Field.
2. (B) \"Goldilocks\" Zone: A correlation graph peaking at 0.5.
3. (C) Paternal Leakage Collapse: A bar chart showing cluster stability dropping as leakage increases.
4. (D) Memory Self-Organization: A 3D sphere showing engram formation.

Keep your answers concise, scientific but accessible, and \"cool\". Use terms like \"decoherence\", \"phase space\", and \"attractor basins\".";

pub const GREETING: &str = "Greetings. I am your Divot Theory analyst. I can interpret the quantum topology and correlation data displayed on the dashboard. What would you like to know?";

/// Appended to the in-progress reply when the completion call fails.
pub const ERROR_NOTICE: &str =
    "\n\n[System Error: Unable to establish quantum link with the AI model.]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Handle for an accepted send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub prompt: String,
    pub reply: MessageId,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
    in_progress: Option<MessageId>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose transcript opens with an assistant greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut s = Self::new();
        if !greeting.trim().is_empty() {
            s.push(Sender::Assistant, greeting.to_string());
        }
        s
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.in_progress.is_some()
    }

    pub fn in_progress(&self) -> Option<&ChatMessage> {
        let id = self.in_progress?;
        self.messages.iter().rev().find(|m| m.id == id)
    }

    /// Whether `send(text)` would be accepted right now.
    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.is_streaming()
    }

    fn push(&mut self, sender: Sender, text: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            sender,
            text,
            created_at: Utc::now(),
        });
        id
    }

    /// Append the user message and an empty reply placeholder. `None` when the
    /// text is blank or another reply is still streaming.
    pub fn begin(&mut self, text: &str) -> Option<Turn> {
        if !self.can_send(text) {
            return None;
        }
        self.push(Sender::User, text.to_string());
        let reply = self.push(Sender::Assistant, String::new());
        self.in_progress = Some(reply);
        Some(Turn {
            prompt: text.to_string(),
            reply,
        })
    }

    /// Extend the in-progress reply. Returns `false` when nothing is streaming.
    pub fn append_fragment(&mut self, fragment: &str) -> bool {
        let Some(id) = self.in_progress else {
            return false;
        };
        match self.messages.iter_mut().rev().find(|m| m.id == id) {
            Some(msg) => {
                msg.text.push_str(fragment);
                true
            }
            None => false,
        }
    }

    /// Seal the in-progress reply.
    pub fn complete(&mut self) {
        self.in_progress = None;
    }

    /// Append [`ERROR_NOTICE`] to the in-progress reply and seal it.
    pub fn fail(&mut self) {
        self.append_fragment(ERROR_NOTICE);
        self.complete();
    }
}

/// One step a transcript view takes to catch up with the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TranscriptUpdate<'a> {
    /// Replace the text of the newest bubble already on screen.
    Rewrite(&'a ChatMessage),
    /// Add a bubble, with its text, for a message not yet shown.
    Append(&'a ChatMessage),
}

/// Steps for a view currently showing the first `shown` messages. Only the
/// newest shown message can have changed since the last call.
pub fn transcript_updates(messages: &[ChatMessage], shown: usize) -> Vec<TranscriptUpdate<'_>> {
    if shown > messages.len() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(messages.len() - shown + 1);
    if shown > 0 {
        out.push(TranscriptUpdate::Rewrite(&messages[shown - 1]));
    }
    out.extend(messages[shown..].iter().map(TranscriptUpdate::Append));
    out
}

/// Ordered text fragments ending in success (stream end) or one error.
pub type FragmentStream = LocalBoxStream<'static, Result<String, CompletionError>>;

/// Hosted completion provider.
pub trait CompletionService {
    fn open_stream(&self, context: &str, message: &str) -> FragmentStream;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a send already in flight; nothing changed.
    Rejected,
    Completed,
    /// The reply ends with [`ERROR_NOTICE`].
    Failed,
}

/// Run one send to completion.
///
/// `on_change` sees the session after the turn is opened, after every fragment
/// and once the reply is sealed. The session is never borrowed across an
/// await, so the UI may read it freely while the stream is in flight.
pub async fn send<S>(
    session: &RefCell<ChatSession>,
    service: &S,
    text: &str,
    mut on_change: impl FnMut(&ChatSession),
) -> SendOutcome
where
    S: CompletionService + ?Sized,
{
    let turn = match session.borrow_mut().begin(text) {
        Some(t) => t,
        None => return SendOutcome::Rejected,
    };
    on_change(&session.borrow());
    log::info!("[chat] sending {} chars", turn.prompt.chars().count());

    let mut stream = service.open_stream(PERSONA, &turn.prompt);
    let mut outcome = SendOutcome::Completed;
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                if fragment.is_empty() {
                    continue;
                }
                session.borrow_mut().append_fragment(&fragment);
                on_change(&session.borrow());
            }
            Err(e) => {
                log::warn!("[chat] completion failed: {}", e);
                session.borrow_mut().fail();
                outcome = SendOutcome::Failed;
                break;
            }
        }
    }
    if outcome == SendOutcome::Completed {
        session.borrow_mut().complete();
    }
    on_change(&session.borrow());
    outcome
}
