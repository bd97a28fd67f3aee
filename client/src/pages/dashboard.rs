//! Dashboard: dossier counts by status and the most recent dossiers.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Both panels load once the
//! session is known to be valid; they load independently so one failing
//! panel does not blank the other.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use portal::types::{DossierStatus, DossierSummary, Overview, PortalSettings};

use crate::components::authed_page::AuthedPage;
use crate::components::dossier_table::DossierTable;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

const CARD_STATUSES: [DossierStatus; 6] = [
    DossierStatus::Draft,
    DossierStatus::Submitted,
    DossierStatus::InReview,
    DossierStatus::AwaitingPayment,
    DossierStatus::Approved,
    DossierStatus::Rejected,
];

/// `(label, count)` for each overview card, total first.
#[must_use]
pub fn overview_cards(overview: &Overview) -> Vec<(String, u64)> {
    let mut cards = vec![("Total".to_owned(), overview.total())];
    cards.extend(CARD_STATUSES.iter().map(|s| (s.label().to_owned(), overview.count(s))));
    cards
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();

    let overview = RwSignal::new(None::<Overview>);
    let recent = RwSignal::new(Vec::<DossierSummary>::new());
    let loading = RwSignal::new(true);
    let requested = RwSignal::new(false);

    Effect::new(move || {
        if requested.get() || !auth.with(AuthState::is_authenticated) {
            return;
        }
        requested.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            let (counts, latest) = futures::join!(client.overview(), client.recent_dossiers());
            match counts {
                Ok(counts) => overview.set(Some(counts)),
                Err(err) => crate::util::auth::on_api_error(auth, &notifier, &err),
            }
            match latest {
                Ok(latest) => recent.set(latest),
                Err(err) => log::warn!("recent dossiers failed: {err}"),
            }
            loading.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (settings, notifier, overview, recent);
    });

    let cards = move || {
        overview
            .get()
            .map(|o| overview_cards(&o))
            .unwrap_or_default()
            .into_iter()
            .map(|(label, count)| {
                view! {
                    <div class="overview-card">
                        <span class="overview-card__count">{count}</span>
                        <span class="overview-card__label">{label}</span>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <AuthedPage title="Dashboard">
            <section class="dashboard__overview">{cards}</section>
            <section class="dashboard__recent">
                <header class="dashboard__recent-header">
                    <h2>"Recent dossiers"</h2>
                    <a class="btn btn--primary" href="/dossiers/new">
                        "+ New dossier"
                    </a>
                </header>
                <Show when=move || !loading.get() fallback=|| view! { <p>"Loading dossiers..."</p> }>
                    <DossierTable rows=recent/>
                </Show>
            </section>
        </AuthedPage>
    }
}
