use std::time::{Duration, Instant};

/// How long a message stays visible after it is shown.
pub const FEEDBACK_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

impl FeedbackKind {
    pub fn css_class(self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    pub expires_at: Instant,
}

impl Feedback {
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

/// Single-slot status message. The newest message always replaces the
/// previous one and carries its own expiry, so an older message can never
/// cut a newer one short.
#[derive(Debug, Default)]
pub struct FeedbackChannel {
    slot: Option<Feedback>,
}

impl FeedbackChannel {
    pub fn show(&mut self, text: impl Into<String>, kind: FeedbackKind) {
        self.show_at(text, kind, Instant::now());
    }

    pub fn show_at(&mut self, text: impl Into<String>, kind: FeedbackKind, now: Instant) {
        self.slot = Some(Feedback {
            text: text.into(),
            kind,
            expires_at: now + FEEDBACK_WINDOW,
        });
    }

    pub fn visible_at(&self, now: Instant) -> Option<&Feedback> {
        self.slot.as_ref().filter(|f| now < f.expires_at)
    }

    pub fn visible(&self) -> Option<&Feedback> {
        self.visible_at(Instant::now())
    }
}
