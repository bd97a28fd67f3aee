//! User-facing notification boundary.
//!
//! Workflow code reports outcomes through [`Notifier`] so it never depends on
//! a concrete toast/modal implementation. The browser client backs it with
//! reactive toast state; the CLI prints to stderr.

/// Severity of a user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

/// A message queued for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    /// Block until the user accepts or declines. `true` means proceed.
    fn confirm(&self, message: &str) -> bool;
}
