use super::*;

#[test]
fn ui_state_default_is_empty() {
    let state = UiState::default();
    assert!(state.toasts.is_empty());
    assert!(state.alert.is_none());
}

#[test]
fn push_toast_assigns_increasing_ids() {
    let mut state = UiState::default();
    let a = state.push_toast(NotificationKind::Success, "saved");
    let b = state.push_toast(NotificationKind::Success, "saved again");
    assert!(b > a);
    assert_eq!(state.toasts.len(), 2);
}

#[test]
fn push_toast_drops_oldest_over_cap() {
    let mut state = UiState::default();
    for i in 0..MAX_TOASTS + 2 {
        state.push_toast(NotificationKind::Success, &format!("t{i}"));
    }
    assert_eq!(state.toasts.len(), MAX_TOASTS);
    assert_eq!(state.toasts[0].message, "t2");
}

#[test]
fn dismiss_removes_only_matching_toast() {
    let mut state = UiState::default();
    let a = state.push_toast(NotificationKind::Success, "a");
    state.push_toast(NotificationKind::Warning, "b");
    state.dismiss(a);
    assert_eq!(state.toasts.len(), 1);
    assert_eq!(state.toasts[0].message, "b");
}

#[test]
fn alert_replaces_previous_and_closes() {
    let mut state = UiState::default();
    state.show_alert(NotificationKind::Warning, "first");
    state.show_alert(NotificationKind::Error, "second");
    let alert = state.alert.clone().unwrap();
    assert_eq!(alert.message, "second");
    assert_eq!(alert.title(), "Something went wrong");
    state.close_alert();
    assert!(state.alert.is_none());
}

#[test]
fn notifier_routes_messages() {
    let owner = Owner::new();
    owner.with(|| {
        let ui = RwSignal::new(UiState::default());
        let notifier = UiNotifier::new(ui);
        notifier.success("saved");
        notifier.warning("careful");
        let state = ui.get_untracked();
        assert_eq!(state.toasts.len(), 1);
        assert_eq!(state.toasts[0].kind, NotificationKind::Success);
        assert_eq!(state.alert.unwrap().kind, NotificationKind::Warning);
        assert!(notifier.confirm("ok?"));
    });
}
