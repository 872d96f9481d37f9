//! Chat client for the sahaya endpoint.
//!
//! A [`ChatSession`] owns the conversation log and allows one turn in flight
//! at a time. The endpoint is reached through a [`ChatTransport`];
//! [`HttpChatTransport`] is the production implementation.

mod error;
mod message;
mod session;
mod transport;

pub use error::TransportError;
pub use message::ChatMessage;
pub use session::{ChatSession, SubmitOutcome, FALLBACK_MESSAGE, GREETING};
pub use transport::{ChatTransport, HttpChatTransport, DEFAULT_ENDPOINT};
