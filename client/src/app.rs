//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};
use portal::types::PortalSettings;

use crate::components::notifications::NotificationLayer;
use crate::pages::{
    dashboard::DashboardPage, dossier_detail::DossierDetailPage, dossier_new::DossierNewPage,
    dossiers::DossiersPage, login::LoginPage, payment::PaymentPage, profile::ProfilePage,
    register::RegisterPage, verify::VerifyPage,
};
use crate::state::{auth::AuthState, ui::UiState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides shared state contexts, restores the session once settings are
/// known, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let settings = RwSignal::new(PortalSettings::default());
    let auth = RwSignal::new(AuthState { user: None, loading: true, pending_email: None });
    let ui = RwSignal::new(UiState::default());

    provide_context(settings);
    provide_context(auth);
    provide_context(ui);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        if let Some(loaded) = crate::net::api::fetch_settings().await {
            settings.set(loaded);
        }
        let user = crate::net::api::restore_user(&settings.get_untracked()).await;
        auth.update(|a| {
            a.user = user;
            a.loading = false;
        });
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/portal.css"/>
        <Title text="Homologation Portal"/>

        <Router>
            <NotificationLayer/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("verify") view=VerifyPage/>
                <Route path=StaticSegment("profile") view=ProfilePage/>
                <Route path=StaticSegment("") view=DashboardPage/>
                <Route path=StaticSegment("dossiers") view=DossiersPage/>
                <Route path=(StaticSegment("dossiers"), StaticSegment("new")) view=DossierNewPage/>
                <Route
                    path=(StaticSegment("dossiers"), ParamSegment("id"), StaticSegment("payment"))
                    view=PaymentPage
                />
                <Route path=(StaticSegment("dossiers"), ParamSegment("id")) view=DossierDetailPage/>
            </Routes>
        </Router>
    }
}
