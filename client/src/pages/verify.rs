//! OTP verification after registration, with a throttled resend.

#[cfg(test)]
#[path = "verify_test.rs"]
mod verify_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use portal::auth::{ResendCountdown, normalize_otp_input, validate_otp};
use portal::types::{OtpRequest, PortalSettings};

use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

#[must_use]
pub fn resend_label(countdown: ResendCountdown) -> String {
    if countdown.can_resend() { "Resend code".to_owned() } else { format!("Resend in {}", countdown.label()) }
}

#[component]
pub fn VerifyPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();
    let navigate = use_navigate();

    let email = RwSignal::new(auth.get_untracked().pending_email.unwrap_or_default());
    let code = RwSignal::new(String::new());
    let countdown = RwSignal::new(ResendCountdown::started());
    let busy = RwSignal::new(false);
    let info = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let alive_task = alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
                if !alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                if !countdown.get_untracked().can_resend() {
                    countdown.update(ResendCountdown::tick);
                }
            }
        });
        on_cleanup(move || alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        if email_value.is_empty() {
            info.set("Enter the email you registered with.".to_owned());
            return;
        }
        let code_value = match validate_otp(&code.get()) {
            Ok(code_value) => code_value,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let request = OtpRequest { email: email_value, code: code_value };
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                use leptos_router::NavigateOptions;
                use portal::PortalApi as _;
                use portal::notify::Notifier as _;

                let client = crate::net::api::BrowserApi::from_signal(settings);
                match client.verify_otp(&request).await {
                    Ok(_) => {
                        notifier.success("Email verified.");
                        let user = if client.session().is_authenticated() {
                            client.current_user().await.ok()
                        } else {
                            None
                        };
                        let target = if user.is_some() { "/" } else { "/login" };
                        auth.update(|a| {
                            a.pending_email = None;
                            a.user = user;
                        });
                        navigate(target, NavigateOptions::default());
                    }
                    Err(err) => {
                        info.set(err.user_message());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (request, auth, settings, notifier, &navigate);
        }
    };

    let on_resend = move |_| {
        if !countdown.get().can_resend() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        if email_value.is_empty() {
            info.set("Enter the email you registered with.".to_owned());
            return;
        }
        countdown.update(ResendCountdown::restart);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;
            use portal::notify::Notifier as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            match client.resend_otp(&email_value).await {
                Ok(ack) => notifier.success(ack.message.as_deref().unwrap_or("A new code is on its way.")),
                Err(err) => notifier.error(&err.user_message()),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = email_value;
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Verify your email"</h1>
                <p class="login-card__subtitle">"Enter the 6-digit code we sent you."</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@company.cg"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input login-input--code"
                        type="text"
                        inputmode="numeric"
                        maxlength="6"
                        placeholder="123456"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(normalize_otp_input(&event_target_value(&ev)))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Verify"
                    </button>
                </form>
                <button
                    class="btn login-resend"
                    disabled=move || !countdown.get().can_resend()
                    on:click=on_resend
                >
                    {move || resend_label(countdown.get())}
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
