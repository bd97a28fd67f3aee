//! New dossier: dossier form, tabbed equipment editor, and submission.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page owns three pieces of state:
//! - `store`: the committed `DraftStore` (dossier draft + equipment list),
//! - `working`: the editable copy of the active equipment draft,
//! - `submitter`: remembers a dossier created by a partially failed submit.
//!
//! Saving commits `working` into `store`. Switching or adding tabs asks before
//! dropping unsaved edits. Submission runs on clones of `store` and
//! `submitter` and writes both back when it settles, so every editing
//! control is locked while `busy` is set.

#[cfg(test)]
#[path = "dossier_new_test.rs"]
mod dossier_new_test;

use leptos::prelude::*;
use portal::attachment::Attachment;
use portal::draft::{DossierDraft, DraftStore, EquipmentDraft};
use portal::notify::Notifier;
use portal::submit::Submitter;
use portal::types::PortalSettings;
use portal::validation::{ValidationReport, validate_equipment};

use crate::components::authed_page::AuthedPage;
use crate::components::equipment_form::EquipmentForm;
use crate::components::file_field::FileField;
use crate::components::text_field::TextField;
use crate::state::auth::AuthState;
use crate::state::ui::UiNotifier;

/// Banner shown while a created dossier still has equipment to post.
#[must_use]
pub fn pending_notice(dossier_id: &str, remaining: usize) -> String {
    let noun = if remaining == 1 { "entry" } else { "entries" };
    format!(
        "Dossier {dossier_id} was created, but {remaining} equipment {noun} did not save. \
         Retry sends only these entries to the same dossier."
    )
}

/// Tab captions, marking the active one when it has unsaved edits.
#[must_use]
pub fn tab_captions(store: &DraftStore, working: &EquipmentDraft) -> Vec<String> {
    let dirty = store.has_unsaved_changes(working);
    store
        .equipment()
        .iter()
        .enumerate()
        .map(|(i, draft)| {
            let label = draft.tab_label(i);
            if dirty && i == store.active() { format!("{label} *") } else { label }
        })
        .collect()
}

/// Wrap an editor handler so it does nothing while a submission is running.
pub fn unless_busy<T>(
    busy: RwSignal<bool>,
    handler: impl Fn(T) + Copy + Send + Sync + 'static,
) -> impl Fn(T) + Copy + Send + Sync + 'static {
    move |arg| {
        if !busy.get_untracked() {
            handler(arg);
        }
    }
}

#[component]
pub fn DossierNewPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let settings = expect_context::<RwSignal<PortalSettings>>();
    let notifier = UiNotifier::from_context();

    let store = RwSignal::new(DraftStore::new());
    let working = RwSignal::new(EquipmentDraft::default());
    let errors = RwSignal::new(ValidationReport::default());
    let submitter = RwSignal::new(Submitter::new());
    let busy = RwSignal::new(false);

    let load_active = move || {
        working.set(store.with_untracked(|s| s.active_draft().clone()));
        errors.set(ValidationReport::default());
    };
    let is_dirty = move || store.with_untracked(|s| working.with_untracked(|w| s.has_unsaved_changes(w)));

    let on_select = unless_busy(busy, move |index: usize| {
        if index == store.with_untracked(DraftStore::active) {
            return;
        }
        if is_dirty() && !notifier.confirm("Discard unsaved changes to this equipment?") {
            return;
        }
        store.update(|s| {
            s.select(index);
        });
        load_active();
    });

    let on_add = unless_busy(busy, move |_: leptos::ev::MouseEvent| {
        let added = store
            .try_update(|s| working.with_untracked(|w| s.add_equipment_confirmed(w, &notifier)))
            .unwrap_or(false);
        if added {
            load_active();
        }
    });

    let on_save = unless_busy(busy, move |_: leptos::ev::MouseEvent| {
        let draft = working.get_untracked();
        let report = validate_equipment(&draft);
        if !report.is_valid() {
            notifier.error(&report.alert_message());
            errors.set(report);
            return;
        }
        errors.set(ValidationReport::default());
        let index = store.with_untracked(DraftStore::active);
        store.update(|s| {
            s.update_equipment(index, draft);
        });
        notifier.success("Equipment saved.");
    });

    let on_delete = unless_busy(busy, move |_: leptos::ev::MouseEvent| {
        if store.try_update(DraftStore::delete_equipment).unwrap_or(false) {
            load_active();
        } else {
            notifier.warning("A dossier needs at least one equipment entry.");
        }
    });

    let on_label = unless_busy(busy, move |label: String| {
        store.update(|s| s.set_dossier(DossierDraft { label, ..s.dossier().clone() }));
    });
    let on_cover_letter = unless_busy(busy, move |file: Option<Attachment>| {
        store.update(|s| {
            let mut dossier = s.dossier().clone();
            dossier.cover_letter = file;
            s.set_dossier(dossier);
        });
    });
    let locked = Signal::derive(move || busy.get());

    let on_submit = move |retry: bool| {
        if busy.get_untracked() {
            return;
        }
        if is_dirty() {
            notifier.warning("Save the current equipment before submitting.");
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use portal::submit::SubmitError;

            let client = crate::net::api::BrowserApi::from_signal(settings);
            let mut drafts = store.get_untracked();
            let mut runner = submitter.get_untracked();
            let outcome = if retry {
                runner.retry_failed(&client, &notifier, &mut drafts).await
            } else {
                runner.submit(&client, &notifier, &mut drafts).await
            };
            if let Err(SubmitError::CreateDossier(err)) = &outcome {
                if err.is_unauthorized() {
                    auth.update(|a| a.user = None);
                }
            }
            if let Ok(report) = &outcome {
                log::info!("dossier {} submitted: {}", report.dossier_id, report.summary());
            }
            store.set(drafts);
            submitter.set(runner);
            load_active();
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (retry, auth, settings);
            busy.set(false);
        }
    };

    let on_abandon = move |_| {
        if notifier.confirm("Forget the partially submitted dossier? The next submit creates a new one.") {
            submitter.update(Submitter::abandon);
        }
    };

    let pending = move || submitter.with(|s| s.pending_dossier_id().map(str::to_owned));

    let tabs = move || {
        let captions = store.with(|s| working.with(|w| tab_captions(s, w)));
        let active = store.with(DraftStore::active);
        captions
            .into_iter()
            .enumerate()
            .map(|(i, caption)| {
                view! {
                    <button
                        class="equipment-tabs__tab"
                        class:equipment-tabs__tab--active=i == active
                        disabled=move || busy.get()
                        on:click=move |_| on_select(i)
                    >
                        {caption}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <AuthedPage title="New dossier">
            <Show when=move || pending().is_some()>
                <div class="banner banner--warning">
                    <p>
                        {move || {
                            let remaining = store.with(|s| s.equipment().len());
                            pending().map(|id| pending_notice(&id, remaining)).unwrap_or_default()
                        }}
                    </p>
                    <button class="btn btn--primary" disabled=move || busy.get() on:click=move |_| on_submit(true)>
                        "Retry failed equipment"
                    </button>
                    <button class="btn" disabled=move || busy.get() on:click=on_abandon>
                        "Start over"
                    </button>
                </div>
            </Show>

            <section class="dossier-form">
                <TextField
                    label="Dossier label"
                    value=Signal::derive(move || store.with(|s| s.dossier().label.clone()))
                    on_input=Callback::new(on_label)
                    disabled=locked
                />
                <FileField
                    label="Signed cover letter"
                    file=Signal::derive(move || store.with(|s| s.dossier().cover_letter.clone()))
                    on_pick=Callback::new(on_cover_letter)
                    disabled=locked
                />
            </section>

            <section class="equipment-editor">
                <div class="equipment-tabs">
                    {tabs}
                    <button class="btn equipment-tabs__add" disabled=move || busy.get() on:click=on_add>
                        "+ Add equipment"
                    </button>
                </div>
                <EquipmentForm working=working errors=errors disabled=locked/>
                <div class="equipment-editor__actions">
                    <button class="btn" disabled=move || busy.get() on:click=on_save>
                        "Save equipment"
                    </button>
                    <button
                        class="btn btn--danger"
                        disabled=move || busy.get() || store.with(|s| s.equipment().len() <= 1)
                        on:click=on_delete
                    >
                        "Delete equipment"
                    </button>
                </div>
            </section>

            <footer class="dossier-new__footer">
                <button
                    class="btn btn--primary"
                    disabled=move || busy.get() || pending().is_some()
                    on:click=move |_| on_submit(false)
                >
                    {move || if busy.get() { "Submitting..." } else { "Submit dossier" }}
                </button>
            </footer>
        </AuthedPage>
    }
}
