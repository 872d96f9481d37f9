use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ChatMessage, ChatTransport};

pub const GREETING: &str = "Hello! I'm here to help you with Hindu Online Marriage Registration in Karnataka through the Kaveri portal. How can I assist you today? 😊";

pub const FALLBACK_MESSAGE: &str = "I'm sorry, something went wrong. Please try again.";

/// Result of one [`ChatSession::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input. Nothing was appended.
    Ignored,
    /// Another turn is in flight. Nothing was appended.
    Busy,
    /// The endpoint answered and the answer was appended.
    Answered,
    /// The fallback message was appended.
    Failed,
}

/// Conversation state for one user.
///
/// The log starts with a greeting and only grows. At most one turn is in
/// flight; the pending flag is cleared by a guard, so a dropped `submit`
/// future still returns the session to idle.
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    log: Mutex<Vec<ChatMessage>>,
    pending: AtomicBool,
}

impl ChatSession {
    pub fn new<T>(transport: T) -> Self
    where
        T: ChatTransport + 'static,
    {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            log: Mutex::new(vec![ChatMessage::assistant(GREETING)]),
            pending: AtomicBool::new(false),
        }
    }

    /// Snapshot of the log in insertion order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.log().clone()
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(mut turn) = PendingTurn::begin(self) else {
            tracing::debug!("submit ignored while a turn is pending");
            return SubmitOutcome::Busy;
        };

        self.push(ChatMessage::user(text));
        match self.transport.send(text).await {
            Ok(answer) => {
                turn.finish(ChatMessage::assistant(answer));
                SubmitOutcome::Answered
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                turn.finish(ChatMessage::assistant(FALLBACK_MESSAGE));
                SubmitOutcome::Failed
            }
        }
    }

    fn push(&self, message: ChatMessage) {
        self.log().push(message);
    }

    fn log(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the pending flag for one turn. Dropping an unfinished turn appends
/// the fallback so every user message gets exactly one reply.
struct PendingTurn<'a> {
    session: &'a ChatSession,
    finished: bool,
}

impl<'a> PendingTurn<'a> {
    fn begin(session: &'a ChatSession) -> Option<Self> {
        session
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                session,
                finished: false,
            })
    }

    fn finish(&mut self, reply: ChatMessage) {
        self.session.push(reply);
        self.finished = true;
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("chat turn cancelled before a reply arrived");
            self.session.push(ChatMessage::assistant(FALLBACK_MESSAGE));
        }
        self.session.pending.store(false, Ordering::SeqCst);
    }
}
