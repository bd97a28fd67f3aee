//! Company profile view and edit.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use portal::auth::validate_profile;
use portal::types::{PortalSettings, ProfileUpdate};
use portal::validation::ValidationReport;

use crate::components::authed_page::AuthedPage;
use crate::components::text_field::TextField;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

pub const FIELDS: &[(&str, &str, &str)] = &[
    ("companyName", "Company name", "text"),
    ("contactName", "Contact name", "text"),
    ("email", "Email", "email"),
    ("phone", "Phone", "tel"),
    ("address", "Address", "text"),
];

#[must_use]
pub fn field_value(profile: &ProfileUpdate, key: &str) -> String {
    match key {
        "companyName" => profile.company_name.clone(),
        "contactName" => profile.contact_name.clone(),
        "email" => profile.email.clone(),
        "phone" => profile.phone.clone(),
        "address" => profile.address.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Write one field; a blank address is stored as `None`.
pub fn set_field(profile: &mut ProfileUpdate, key: &str, value: String) {
    match key {
        "companyName" => profile.company_name = value,
        "contactName" => profile.contact_name = value,
        "email" => profile.email = value,
        "phone" => profile.phone = value,
        "address" => profile.address = (!value.trim().is_empty()).then_some(value),
        _ => {}
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();

    let form = RwSignal::new(ProfileUpdate::default());
    let errors = RwSignal::new(ValidationReport::default());
    let busy = RwSignal::new(false);

    // Seed the form whenever the signed-in user changes.
    Effect::new(move || {
        if let Some(user) = auth.get().user {
            form.set(ProfileUpdate::from(&user));
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let update = form.get();
        let report = validate_profile(&update);
        let valid = report.is_valid();
        errors.set(report);
        if !valid {
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;
            use portal::notify::Notifier as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            match client.update_profile(&update).await {
                Ok(user) => {
                    auth.update(|a| a.user = Some(user));
                    notifier.success("Profile updated.");
                }
                Err(err) => crate::util::auth::on_api_error(auth, &notifier, &err),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (update, settings, notifier);
    };

    let fields = move || {
        FIELDS
            .iter()
            .map(|&(key, label, input_type)| {
                view! {
                    <TextField
                        label=label
                        input_type=input_type
                        value=Signal::derive(move || form.with(|f| field_value(f, key)))
                        on_input=Callback::new(move |v: String| form.update(|f| set_field(f, key, v)))
                        error=Signal::derive(move || errors.with(|r| r.error(key).map(str::to_owned)))
                    />
                }
            })
            .collect_view()
    };

    view! {
        <AuthedPage title="Company profile">
            <form class="profile-form" on:submit=on_submit>
                {fields()}
                <p class="profile-form__meta">
                    "NIU: "
                    {move || auth.get().user.and_then(|u| u.niu).unwrap_or_default()}
                </p>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    "Save profile"
                </button>
            </form>
        </AuthedPage>
    }
}
