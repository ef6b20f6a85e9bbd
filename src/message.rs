//! Transient user-facing status messages.
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: MessageKind::Error,
        }
    }
}

/// Holds the latest message until its display time runs out.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    current: Option<(Message, Instant)>,
    display_for: Duration,
}

impl MessageBoard {
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: None,
            display_for,
        }
    }

    /// Replace any shown message; the new one expires after the display time.
    pub fn post(&mut self, message: Message) {
        self.current = Some((message, Instant::now()));
    }

    pub fn current(&self) -> Option<&Message> {
        self.current
            .as_ref()
            .filter(|(_, posted)| posted.elapsed() < self.display_for)
            .map(|(message, _)| message)
    }

    /// The latest message even if it already expired.
    pub fn last(&self) -> Option<&Message> {
        self.current.as_ref().map(|(message, _)| message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire_after_display_time() {
        let mut board = MessageBoard::new(Duration::ZERO);
        board.post(Message::success("saved"));
        assert!(board.current().is_none());
        assert_eq!(board.last(), Some(&Message::success("saved")));

        let mut board = MessageBoard::new(Duration::from_secs(60));
        board.post(Message::error("failed"));
        board.post(Message::success("saved"));
        assert_eq!(board.current(), Some(&Message::success("saved")));
    }
}
