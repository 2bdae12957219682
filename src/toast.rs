//! Transient notifications shown over the main view.

use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn label(self) -> &'static str {
        match self {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Ordered queue of toasts. Ids only ever grow.
#[derive(Debug)]
pub struct ToastService {
    toasts: Vec<Toast>,
    next_id: u64,
    duration: Duration,
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastService {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            duration,
        }
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.show_at(message, kind, Instant::now())
    }

    fn show_at(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            expires_at: now + self.duration,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Warning)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Info)
    }

    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Drop every toast whose time is up. Returns true if any were removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        self.toasts.len() != before
    }
}
