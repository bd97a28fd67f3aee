//! Paginated, searchable, sortable dossier listing.

#[cfg(test)]
#[path = "dossiers_test.rs"]
mod dossiers_test;

use leptos::prelude::*;
use portal::listing::ListQuery;
use portal::types::{DossierPage, PortalSettings};

use crate::components::authed_page::AuthedPage;
use crate::components::dossier_table::DossierTable;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

#[must_use]
pub fn page_label(page: &DossierPage) -> String {
    let mut label = format!("Page {} of {}", page.page, page.total_pages.max(1));
    if let Some(total) = page.total {
        label.push_str(&format!(" ({total} dossiers)"));
    }
    label
}

#[component]
pub fn DossiersPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();

    let query = RwSignal::new(ListQuery::default());
    let page = RwSignal::new(DossierPage::default());
    let search = RwSignal::new(String::new());
    let loading = RwSignal::new(false);
    // Responses for superseded queries are dropped.
    let generation = RwSignal::new(0_u64);

    Effect::new(move || {
        let current = query.get();
        if !auth.with(AuthState::is_authenticated) {
            return;
        }
        let ticket = generation.get_untracked() + 1;
        generation.set(ticket);
        loading.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            let result = client.list_dossiers(&current).await;
            if generation.get_untracked() != ticket {
                return;
            }
            match result {
                Ok(loaded) => page.set(loaded),
                Err(err) => crate::util::auth::on_api_error(auth, &notifier, &err),
            }
            loading.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (current, settings, notifier, page);
    });

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        query.update(|q| q.set_search(&search.get_untracked()));
    };
    let on_sort = Callback::new(move |column: String| query.update(|q| q.toggle_sort(&column)));
    let sort = Signal::derive(move || query.with(|q| (q.sort_by.clone(), q.order)));
    let rows = Signal::derive(move || page.with(|p| p.items.clone()));

    view! {
        <AuthedPage title="My dossiers">
            <form class="dossiers__search" on:submit=on_search>
                <input
                    type="search"
                    placeholder="Search by label or reference"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
                <button class="btn" type="submit">
                    "Search"
                </button>
                <a class="btn btn--primary" href="/dossiers/new">
                    "+ New dossier"
                </a>
            </form>
            <DossierTable rows=rows sort=sort on_sort=on_sort/>
            <Show when=move || loading.get()>
                <p class="dossiers__loading">"Loading..."</p>
            </Show>
            <nav class="pager">
                <button
                    class="btn pager__prev"
                    disabled=move || query.with(|q| q.page <= 1)
                    on:click=move |_| query.update(ListQuery::prev_page)
                >
                    "Previous"
                </button>
                <span class="pager__label">{move || page.with(page_label)}</span>
                <button
                    class="btn pager__next"
                    disabled=move || page.with(|p| p.page >= p.total_pages)
                    on:click=move |_| {
                        let total = page.with_untracked(|p| p.total_pages);
                        query.update(|q| q.next_page(total));
                    }
                >
                    "Next"
                </button>
            </nav>
        </AuthedPage>
    }
}
