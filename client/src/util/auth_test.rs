use super::*;
use portal::types::User;

use crate::state::ui::{UiNotifier, UiState};

fn signed_in() -> AuthState {
    AuthState {
        user: Some(User { id: "7".into(), email: "ops@acme.cg".into(), ..User::default() }),
        loading: false,
        pending_email: None,
    }
}

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    let state = AuthState { user: None, loading: false, pending_email: None };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = AuthState { user: None, loading: true, pending_email: None };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&signed_in()));
}

#[test]
fn unauthorized_error_signs_out_and_alerts() {
    let owner = Owner::new();
    owner.with(|| {
        let auth = RwSignal::new(signed_in());
        let ui = RwSignal::new(UiState::default());
        on_api_error(auth, &UiNotifier::new(ui), &ApiError::Unauthorized);

        assert!(auth.get_untracked().user.is_none());
        assert!(ui.get_untracked().alert.is_some());
    });
}

#[test]
fn other_errors_keep_the_user() {
    let owner = Owner::new();
    owner.with(|| {
        let auth = RwSignal::new(signed_in());
        let ui = RwSignal::new(UiState::default());
        let err = ApiError::Status { status: 422, message: "Libellé déjà utilisé".into() };
        on_api_error(auth, &UiNotifier::new(ui), &err);

        assert!(auth.get_untracked().user.is_some());
        let alert = ui.get_untracked().alert.map(|a| a.message);
        assert_eq!(alert.as_deref(), Some("Libellé déjà utilisé"));
    });
}
