//! Toast and alert layer.
//!
//! DESIGN
//! ======
//! Workflow code never touches this state directly; it talks to
//! [`UiNotifier`], which implements `portal::Notifier` on top of it.
//! Successes become short-lived toasts; errors and warnings open one modal
//! alert.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use leptos::prelude::*;
use portal::notify::{Notification, NotificationKind, Notifier};

/// Toasts kept on screen at once; older ones are dropped.
pub const MAX_TOASTS: usize = 4;
/// How long a toast stays visible.
pub const TOAST_MILLIS: u64 = 4_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: NotificationKind,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::Success => "Done",
            NotificationKind::Error => "Something went wrong",
            NotificationKind::Warning => "Attention",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub toasts: Vec<Notification>,
    pub alert: Option<Alert>,
    next_id: u64,
}

impl UiState {
    /// Queue a toast and return its id.
    pub fn push_toast(&mut self, kind: NotificationKind, message: &str) -> u64 {
        self.next_id += 1;
        self.toasts.push(Notification { id: self.next_id, kind, message: message.to_owned() });
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn show_alert(&mut self, kind: NotificationKind, message: &str) {
        self.alert = Some(Alert { kind, message: message.to_owned() });
    }

    pub fn close_alert(&mut self) {
        self.alert = None;
    }
}

/// `portal::Notifier` backed by the shared [`UiState`] signal.
#[derive(Clone, Copy)]
pub struct UiNotifier {
    ui: RwSignal<UiState>,
}

impl UiNotifier {
    #[must_use]
    pub fn new(ui: RwSignal<UiState>) -> Self {
        Self { ui }
    }

    /// Notifier bound to the `UiState` in context.
    #[must_use]
    pub fn from_context() -> Self {
        Self::new(expect_context::<RwSignal<UiState>>())
    }

    fn toast(&self, kind: NotificationKind, message: &str) {
        let mut id = 0;
        self.ui.update(|u| id = u.push_toast(kind, message));

        #[cfg(feature = "hydrate")]
        {
            let ui = self.ui;
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(std::time::Duration::from_millis(TOAST_MILLIS)).await;
                ui.update(|u| u.dismiss(id));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = id;
    }
}

impl Notifier for UiNotifier {
    fn success(&self, message: &str) {
        self.toast(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.ui.update(|u| u.show_alert(NotificationKind::Error, message));
    }

    fn warning(&self, message: &str) {
        self.ui.update(|u| u.show_alert(NotificationKind::Warning, message));
    }

    fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window().is_some_and(|w| w.confirm_with_message(message).unwrap_or(false))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = message;
            true
        }
    }
}
