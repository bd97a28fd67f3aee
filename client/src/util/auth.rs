//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior,
//! and every API failure should surface the same way: a `401` drops the
//! signed-in user (the guard then redirects), anything else opens an alert.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use portal::api::ApiError;
use portal::notify::Notifier;

use crate::state::auth::AuthState;

/// Whether a guarded route should leave for `/login`.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Redirect to `/login` whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });
}

/// Surface an API failure; an expired session also signs the user out.
pub fn on_api_error<N: Notifier>(auth: RwSignal<AuthState>, notifier: &N, err: &ApiError) {
    if err.is_unauthorized() {
        auth.update(|a| a.user = None);
    }
    notifier.error(&err.user_message());
}
