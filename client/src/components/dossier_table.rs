//! Table of dossier summaries with optional sortable headers.

#[cfg(test)]
#[path = "dossier_table_test.rs"]
mod dossier_table_test;

use leptos::prelude::*;
use portal::listing::SortOrder;
use portal::payment::format_amount;
use portal::types::DossierSummary;

use crate::components::status_badge::StatusBadge;

/// Sortable columns and their API `sortBy` keys.
pub const COLUMNS: &[(&str, &str)] =
    &[("reference", "Reference"), ("label", "Label"), ("status", "Status"), ("createdAt", "Created")];

/// Header text with an arrow on the active sort column.
#[must_use]
pub fn header_label(label: &str, column: &str, sort_by: &str, order: SortOrder) -> String {
    if column != sort_by {
        return label.to_owned();
    }
    let arrow = match order {
        SortOrder::Asc => "▲",
        SortOrder::Desc => "▼",
    };
    format!("{label} {arrow}")
}

#[component]
pub fn DossierTable(
    #[prop(into)] rows: Signal<Vec<DossierSummary>>,
    /// Current `(sort_by, order)`; headers are plain text when absent.
    #[prop(into, optional)]
    sort: Option<Signal<(String, SortOrder)>>,
    #[prop(optional)] on_sort: Option<Callback<String>>,
) -> impl IntoView {
    let headers = COLUMNS
        .iter()
        .map(|(column, label)| {
            let text = move || match sort {
                Some(sort) => sort.with(|(by, order)| header_label(label, column, by, *order)),
                None => (*label).to_owned(),
            };
            let on_click = move |_| {
                if let Some(on_sort) = on_sort {
                    on_sort.run((*column).to_owned());
                }
            };
            view! { <th class="dossier-table__head" class:dossier-table__head--sortable=on_sort.is_some() on:click=on_click>{text}</th> }
        })
        .collect_view();

    view! {
        <table class="dossier-table">
            <thead>
                <tr>
                    {headers}
                    <th>"Equipment"</th>
                    <th>"Amount due"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || rows.get()
                    key=|row| row.id.clone()
                    children=move |row| {
                        let href = format!("/dossiers/{}", row.id);
                        view! {
                            <tr class="dossier-table__row">
                                <td><a href=href>{row.reference.clone().unwrap_or_else(|| row.id.clone())}</a></td>
                                <td>{row.label}</td>
                                <td><StatusBadge status=row.status/></td>
                                <td>{row.created_at.unwrap_or_default()}</td>
                                <td>{row.equipment_count.map(|n| n.to_string()).unwrap_or_default()}</td>
                                <td>{row.amount_due.map(format_amount).unwrap_or_default()}</td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
        <Show when=move || rows.with(Vec::is_empty)>
            <p class="dossier-table__empty">"No dossiers yet."</p>
        </Show>
    }
}
