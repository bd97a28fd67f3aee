//! Toast stack and modal alert driven by `UiState`.

use leptos::prelude::*;
use portal::notify::NotificationKind;

use crate::state::ui::UiState;

fn kind_modifier(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "success",
        NotificationKind::Error => "error",
        NotificationKind::Warning => "warning",
    }
}

/// Mounted once inside the router; every page's notifications land here.
#[component]
pub fn NotificationLayer() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let on_close = move |_| ui.update(UiState::close_alert);

    view! {
        <div class="toast-stack" aria-live="polite">
            <For
                each=move || ui.get().toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast--{}", kind_modifier(toast.kind))>
                            <span class="toast__message">{toast.message}</span>
                            <button class="toast__close" on:click=move |_| ui.update(|u| u.dismiss(id))>
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
        {move || {
            ui.get()
                .alert
                .map(|alert| {
                    view! {
                        <div class="alert-modal__backdrop" on:click=on_close>
                            <div
                                class=format!("alert-modal alert-modal--{}", kind_modifier(alert.kind))
                                role="alertdialog"
                                on:click=move |ev| ev.stop_propagation()
                            >
                                <h2 class="alert-modal__title">{alert.title()}</h2>
                                <div class="alert-modal__body">
                                    {alert
                                        .message
                                        .lines()
                                        .map(|line| view! { <p>{line.to_owned()}</p> })
                                        .collect_view()}
                                </div>
                                <button class="btn alert-modal__ok" on:click=on_close>
                                    "OK"
                                </button>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
