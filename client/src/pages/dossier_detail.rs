//! One dossier with its equipment and, when due, a link to payment.

#[cfg(test)]
#[path = "dossier_detail_test.rs"]
mod dossier_detail_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use portal::payment::format_amount;
use portal::types::{DossierDetail, PortalSettings};

use crate::components::authed_page::AuthedPage;
use crate::components::status_badge::StatusBadge;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

/// Payment route for a dossier awaiting payment.
#[must_use]
pub fn payment_link(detail: &DossierDetail) -> Option<String> {
    detail.status.requires_payment().then(|| format!("/dossiers/{}/payment", detail.id))
}

#[component]
pub fn DossierDetailPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();
    let params = use_params_map();

    let detail = RwSignal::new(None::<DossierDetail>);

    Effect::new(move || {
        let Some(id) = params.with(|p| p.get("id")) else {
            return;
        };
        if !auth.with(AuthState::is_authenticated) {
            return;
        }

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            match client.dossier(&id).await {
                Ok(loaded) => detail.set(Some(loaded)),
                Err(err) => crate::util::auth::on_api_error(auth, &notifier, &err),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, settings, notifier);
    });

    let body = move || {
        detail.get().map(|d| {
            let pay = payment_link(&d);
            let rows = d
                .equipment
                .iter()
                .map(|e| {
                    view! {
                        <tr>
                            <td>{e.equipment_name.clone()}</td>
                            <td>{e.brand.clone()}</td>
                            <td>{e.model.clone()}</td>
                            <td>{e.manufacturer.clone()}</td>
                            <td>{e.kind.clone()}</td>
                            <td>{e.quantity}</td>
                            <td>
                                {e.technical_sheet_url
                                    .clone()
                                    .map(|url| view! { <a href=url target="_blank">"Sheet"</a> })}
                            </td>
                        </tr>
                    }
                })
                .collect_view();
            view! {
                <dl class="dossier-detail__facts">
                    <dt>"Reference"</dt>
                    <dd>{d.reference.clone().unwrap_or_else(|| d.id.clone())}</dd>
                    <dt>"Label"</dt>
                    <dd>{d.label.clone()}</dd>
                    <dt>"Status"</dt>
                    <dd><StatusBadge status=d.status.clone()/></dd>
                    <dt>"Created"</dt>
                    <dd>{d.created_at.clone().unwrap_or_default()}</dd>
                    <dt>"Cover letter"</dt>
                    <dd>
                        {d.cover_letter_url.clone().map(|url| view! { <a href=url target="_blank">"Open"</a> })}
                    </dd>
                    <dt>"Amount due"</dt>
                    <dd>{d.amount_due.map(format_amount).unwrap_or_else(|| "Not yet assessed".to_owned())}</dd>
                </dl>
                {pay.map(|href| view! { <a class="btn btn--primary" href=href>"Pay now"</a> })}
                <h2>"Equipment"</h2>
                <table class="dossier-detail__equipment">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Brand"</th>
                            <th>"Model"</th>
                            <th>"Manufacturer"</th>
                            <th>"Type"</th>
                            <th>"Quantity"</th>
                            <th>"Technical sheet"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            }
        })
    };

    view! {
        <AuthedPage title="Dossier">
            <Show when=move || detail.with(Option::is_some) fallback=|| view! { <p>"Loading dossier..."</p> }>
                {body}
            </Show>
        </AuthedPage>
    }
}
