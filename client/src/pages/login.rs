//! Email + password sign-in.
//!
//! A successful login stores the token (through the API client's session)
//! and loads the user before navigating to the dashboard. Accounts whose
//! email is not yet verified are sent to `/verify`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use portal::api::ApiError;
use portal::types::PortalSettings;

use crate::state::auth::AuthState;

/// Message shown for a failed login. A `401` here means bad credentials,
/// not an expired session.
#[must_use]
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Invalid email or password.".to_owned(),
        other => other.user_message(),
    }
}

/// Whether the server refused the login because the email is unverified.
#[must_use]
pub fn needs_verification(err: &ApiError) -> bool {
    match err {
        ApiError::Status { status: 403, message } => {
            let lower = message.to_lowercase();
            lower.contains("verif") || lower.contains("otp")
        }
        _ => false,
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match portal::auth::validate_login(&email.get(), &password.get()) {
            Ok(request) => request,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                use leptos_router::NavigateOptions;
                use portal::PortalApi as _;

                let client = crate::net::api::BrowserApi::from_signal(settings);
                match client.login(&request).await {
                    Ok(resp) => {
                        let user = match resp.user {
                            Some(user) => Some(user),
                            None => client.current_user().await.ok(),
                        };
                        auth.update(|a| {
                            a.user = user;
                            a.loading = false;
                        });
                        navigate("/", NavigateOptions::default());
                    }
                    Err(err) if needs_verification(&err) => {
                        auth.update(|a| a.pending_email = Some(request.email.clone()));
                        navigate("/verify", NavigateOptions::default());
                    }
                    Err(err) => {
                        info.set(login_error_message(&err));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (request, auth, settings, &navigate);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Homologation Portal"</h1>
                <p class="login-card__subtitle">"Sign in to manage your dossiers"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@company.cg"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "No account yet? "
                    <a href="/register">"Register your company"</a>
                </p>
            </div>
        </div>
    }
}
