//! Top navigation for authenticated pages.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use portal::types::PortalSettings;

use crate::net::api::BrowserApi;
use crate::state::auth::AuthState;

const LINKS: &[(&str, &str)] =
    &[("/", "Dashboard"), ("/dossiers", "Dossiers"), ("/dossiers/new", "New dossier"), ("/profile", "Profile")];

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let navigate = use_navigate();

    let on_logout = move |_| {
        BrowserApi::from_signal(settings).session().sign_out();
        auth.update(|a| a.user = None);
        navigate("/login", NavigateOptions::default());
    };

    view! {
        <header class="nav-bar">
            <span class="nav-bar__brand">"Homologation Portal"</span>
            <nav class="nav-bar__links">
                {LINKS
                    .iter()
                    .map(|(href, label)| view! { <a class="nav-bar__link" href=*href>{*label}</a> })
                    .collect_view()}
            </nav>
            <span class="nav-bar__spacer"></span>
            <span class="nav-bar__user">{move || auth.get().display_name()}</span>
            <button class="btn nav-bar__logout" on:click=on_logout>
                "Logout"
            </button>
        </header>
    }
}
