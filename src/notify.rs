use serde::Serialize;
use std::time::{Duration, Instant};

pub const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub hide_after_ms: u64,
}

/// Holds the single status message. A new message replaces the old one and
/// restarts the hide deadline.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<(Toast, Instant)>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> Toast {
        let toast = Toast {
            message: message.into(),
            kind,
            hide_after_ms: TOAST_DURATION.as_millis() as u64,
        };
        self.current = Some((toast.clone(), now + TOAST_DURATION));
        toast
    }

    pub fn visible(&self, now: Instant) -> Option<Toast> {
        let (toast, hide_at) = self.current.as_ref()?;
        if now >= *hide_at {
            return None;
        }
        let mut toast = toast.clone();
        toast.hide_after_ms = (*hide_at - now).as_millis() as u64;
        Some(toast)
    }
}
