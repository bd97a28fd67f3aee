//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. The token itself never lives here; it
//! stays behind the API client's `Session`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use portal::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    /// `true` until the stored session has been checked on startup.
    pub loading: bool,
    /// Email awaiting OTP verification after registration.
    pub pending_email: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Name shown in the navigation bar.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user.as_ref().map_or_else(String::new, |u| {
            if u.company_name.trim().is_empty() { u.email.clone() } else { u.company_name.clone() }
        })
    }
}
