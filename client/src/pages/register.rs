//! Company registration. On success the email is kept in `AuthState` and the
//! user continues to `/verify` for the emailed OTP.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use portal::auth::RegisterForm;
use portal::types::PortalSettings;
use portal::validation::ValidationReport;

use crate::components::text_field::TextField;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

/// `(validation key, label, input type)` in display order.
pub const FIELDS: &[(&str, &str, &str)] = &[
    ("companyName", "Company name", "text"),
    ("niu", "Tax identification number (NIU)", "text"),
    ("contactName", "Contact name", "text"),
    ("email", "Email", "email"),
    ("phone", "Phone", "tel"),
    ("address", "Address (optional)", "text"),
    ("password", "Password", "password"),
    ("passwordConfirmation", "Confirm password", "password"),
];

/// The form field behind a validation key.
pub fn field_mut<'a>(form: &'a mut RegisterForm, key: &str) -> Option<&'a mut String> {
    Some(match key {
        "companyName" => &mut form.company_name,
        "niu" => &mut form.niu,
        "contactName" => &mut form.contact_name,
        "email" => &mut form.email,
        "phone" => &mut form.phone,
        "address" => &mut form.address,
        "password" => &mut form.password,
        "passwordConfirmation" => &mut form.password_confirmation,
        _ => return None,
    })
}

#[must_use]
pub fn field_value(form: &RegisterForm, key: &str) -> String {
    let value = match key {
        "companyName" => &form.company_name,
        "niu" => &form.niu,
        "contactName" => &form.contact_name,
        "email" => &form.email,
        "phone" => &form.phone,
        "address" => &form.address,
        "password" => &form.password,
        "passwordConfirmation" => &form.password_confirmation,
        _ => return String::new(),
    };
    value.clone()
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();
    let navigate = use_navigate();

    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(ValidationReport::default());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let report = form.with(RegisterForm::validate);
        let valid = report.is_valid();
        errors.set(report);
        if !valid {
            return;
        }
        let request = form.with(RegisterForm::to_request);
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                use leptos_router::NavigateOptions;
                use portal::PortalApi as _;
                use portal::notify::Notifier as _;

                let client = crate::net::api::BrowserApi::from_signal(settings);
                match client.register(&request).await {
                    Ok(ack) => {
                        auth.update(|a| a.pending_email = Some(request.email.clone()));
                        notifier.success(
                            ack.message.as_deref().unwrap_or("Account created. Enter the code sent to your email."),
                        );
                        navigate("/verify", NavigateOptions::default());
                    }
                    Err(err) => notifier.error(&err.user_message()),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (request, auth, settings, notifier, &navigate);
        }
    };

    let fields = FIELDS
        .iter()
        .map(|&(key, label, input_type)| {
            view! {
                <TextField
                    label=label
                    input_type=input_type
                    value=Signal::derive(move || form.with(|f| field_value(f, key)))
                    on_input=Callback::new(move |v: String| {
                        form.update(|f| {
                            if let Some(slot) = field_mut(f, key) {
                                *slot = v;
                            }
                        });
                    })
                    error=Signal::derive(move || errors.with(|r| r.error(key).map(str::to_owned)))
                />
            }
        })
        .collect_view();

    view! {
        <div class="login-page">
            <div class="login-card login-card--wide">
                <h1>"Create your account"</h1>
                <form class="login-form" on:submit=on_submit>
                    {fields}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
