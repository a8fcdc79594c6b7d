use std::time::{Duration, Instant};

pub const MODIFIED: &str = "Modified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    /// `None` for messages that stay until replaced.
    pub expires_at: Option<Instant>,
}

/// Banner at the bottom of the screen.
///
/// Transient messages expire on their own, but only while they are still the
/// message on display; a newer message resets the clock.
#[derive(Debug, Clone)]
pub struct StatusBar {
    current: Option<StatusMessage>,
    timeout: Duration,
}

impl StatusBar {
    pub fn new(timeout: Duration) -> Self {
        Self { current: None, timeout }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> &str {
        self.current.as_ref().map(|m| m.text.as_str()).unwrap_or("")
    }

    pub fn kind(&self) -> Option<StatusKind> {
        self.current.as_ref().map(|m| m.kind)
    }

    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        self.current = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: Some(now + self.timeout),
        });
    }

    pub fn show_persistent(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.current = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: None,
        });
    }

    /// Drop an expired message, falling back to the modified marker when
    /// there are unsaved edits. Returns whether the banner changed.
    pub fn expire(&mut self, now: Instant, dirty: bool) -> bool {
        let expired = matches!(
            &self.current,
            Some(StatusMessage { expires_at: Some(at), .. }) if *at <= now
        );
        if !expired {
            return false;
        }

        self.current = if dirty {
            Some(StatusMessage {
                text: MODIFIED.to_string(),
                kind: StatusKind::Info,
                expires_at: None,
            })
        } else {
            None
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_message_expires_to_blank() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(5));
        bar.show("Value updated", StatusKind::Success, start);

        assert!(!bar.expire(start + Duration::from_secs(4), false));
        assert_eq!(bar.text(), "Value updated");

        assert!(bar.expire(start + Duration::from_secs(5), false));
        assert_eq!(bar.text(), "");
        assert_eq!(bar.kind(), None);
    }

    #[test]
    fn test_newer_message_restarts_clock() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(5));
        bar.show("first", StatusKind::Info, start);
        bar.show("second", StatusKind::Info, start + Duration::from_secs(3));

        assert!(!bar.expire(start + Duration::from_secs(6), true));
        assert_eq!(bar.text(), "second");

        assert!(bar.expire(start + Duration::from_secs(8), true));
        assert_eq!(bar.text(), MODIFIED);
    }

    #[test]
    fn test_persistent_message_never_expires() {
        let start = Instant::now();
        let mut bar = StatusBar::new(Duration::from_secs(5));
        bar.show_persistent("Server connection lost", StatusKind::Error);
        assert!(!bar.expire(start + Duration::from_secs(3600), false));
        assert_eq!(bar.kind(), Some(StatusKind::Error));
    }
}
