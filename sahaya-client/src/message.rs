use std::fmt;

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One entry of the conversation log. Fields are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    id: Uuid,
    text: String,
    is_user: bool,
    timestamp: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), true)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text.into(), false)
    }

    fn new(text: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            is_user,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let speaker = if self.is_user { "you" } else { "sahaya" };
        write!(f, "[{}] {}: {}", self.timestamp, speaker, self.text)
    }
}
