//! Payment for a dossier awaiting payment.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use portal::payment::PaymentSubmission;
use portal::types::{DossierDetail, PortalSettings};

use crate::components::authed_page::AuthedPage;
use crate::components::payment_selector::PaymentSelector;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

#[component]
pub fn PaymentPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();
    let params = use_params_map();

    let detail = RwSignal::new(None::<DossierDetail>);
    let busy = RwSignal::new(false);

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
        let _ = (id, notifier);
    });

    let on_complete = Callback::new(move |submission: PaymentSubmission| {
        let Some(id) = detail.with_untracked(|d| d.as_ref().map(|d| d.id.clone())) else {
            return;
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::PortalApi as _;
            use portal::notify::Notifier as _;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            match client.submit_payment(&id, &submission).await {
                Ok(ack) if ack.success => {
                    notifier.success(ack.message.as_deref().unwrap_or("Payment recorded."));
                    crate::util::nav::go_to(&format!("/dossiers/{id}"));
                }
                Ok(ack) => notifier.error(ack.message.as_deref().unwrap_or("Payment was not accepted.")),
                Err(err) => crate::util::auth::on_api_error(auth, &notifier, &err),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = (id, submission);
    });

    let body = move || {
        detail.get().map(|d| match d.amount_due {
            Some(amount) if d.status.requires_payment() => {
                let bank = settings.get_untracked().bank;
                view! {
                    <p class="payment-page__dossier">{d.reference.clone().unwrap_or(d.label.clone())}</p>
                    <PaymentSelector amount=amount bank=bank busy=busy on_complete=on_complete/>
                }
                .into_any()
            }
            _ => view! { <p>"This dossier has no payment due."</p> }.into_any(),
        })
    };

    view! {
        <AuthedPage title="Payment">
            <Show when=move || detail.with(Option::is_some) fallback=|| view! { <p>"Loading dossier..."</p> }>
                {body}
            </Show>
        </AuthedPage>
    }
}
