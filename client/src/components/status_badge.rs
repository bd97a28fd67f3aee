//! Colored pill for a dossier's workflow status.

#[cfg(test)]
#[path = "status_badge_test.rs"]
mod status_badge_test;

use leptos::prelude::*;
use portal::types::DossierStatus;

/// CSS modifier for a status; unknown upstream values render neutral.
#[must_use]
pub fn badge_modifier(status: &DossierStatus) -> &'static str {
    match status {
        DossierStatus::Draft => "draft",
        DossierStatus::Submitted | DossierStatus::InReview => "pending",
        DossierStatus::AwaitingPayment => "payment",
        DossierStatus::Approved => "approved",
        DossierStatus::Rejected => "rejected",
        DossierStatus::Other(_) => "neutral",
    }
}

#[component]
pub fn StatusBadge(status: DossierStatus) -> impl IntoView {
    let class = format!("status-badge status-badge--{}", badge_modifier(&status));
    view! { <span class=class>{status.label().to_owned()}</span> }
}
