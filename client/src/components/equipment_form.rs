//! Editor for the active equipment draft.
//!
//! DESIGN
//! ======
//! The form edits a working copy owned by the page. Nothing reaches the
//! `DraftStore` until the page saves it, which is what makes "unsaved
//! changes" detectable when switching or adding tabs.

use leptos::prelude::*;
use portal::draft::EquipmentDraft;
use portal::validation::{EquipmentField, ValidationReport};

use crate::components::file_field::FileField;

const TEXT_FIELDS: [EquipmentField; 6] = [
    EquipmentField::EquipmentName,
    EquipmentField::Model,
    EquipmentField::Brand,
    EquipmentField::Manufacturer,
    EquipmentField::Kind,
    EquipmentField::Quantity,
];

#[component]
pub fn EquipmentForm(
    working: RwSignal<EquipmentDraft>,
    #[prop(into)] errors: Signal<ValidationReport>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let locked = move || disabled.is_some_and(|d| d.get());
    let error_for = move |field: EquipmentField| errors.with(|r| r.error(field.key()).map(str::to_owned));
    let text_of = move |field: EquipmentField| working.with(|d| field.text(d).unwrap_or_default().to_owned());

    let inputs = TEXT_FIELDS
        .into_iter()
        .map(|field| {
            let input_type = if field == EquipmentField::Quantity { "number" } else { "text" };
            view! {
                <label class="form-field" class:form-field--invalid=move || error_for(field).is_some()>
                    <span class="form-field__label">{field.label()}</span>
                    <input
                        type=input_type
                        min="1"
                        name=field.key()
                        prop:value=move || text_of(field)
                        disabled=locked
                        on:input=move |ev| working.update(|d| field.set_text(d, event_target_value(&ev)))
                    />
                    <Show when=move || error_for(field).is_some()>
                        <span class="form-field__error">{move || error_for(field).unwrap_or_default()}</span>
                    </Show>
                </label>
            }
        })
        .collect_view();

    let description = EquipmentField::Description;

    view! {
        <div class="equipment-form">
            <div class="equipment-form__grid">{inputs}</div>
            <label class="form-field" class:form-field--invalid=move || error_for(description).is_some()>
                <span class="form-field__label">{description.label()}</span>
                <textarea
                    name=description.key()
                    rows="4"
                    prop:value=move || text_of(description)
                    disabled=locked
                    on:input=move |ev| working.update(|d| description.set_text(d, event_target_value(&ev)))
                ></textarea>
                <Show when=move || error_for(description).is_some()>
                    <span class="form-field__error">{move || error_for(description).unwrap_or_default()}</span>
                </Show>
            </label>
            <FileField
                label=EquipmentField::TechnicalSheet.label()
                file=Signal::derive(move || working.with(|d| d.technical_sheet.clone()))
                on_pick=Callback::new(move |file| working.update(|d| d.technical_sheet = file))
                error=Signal::derive(move || error_for(EquipmentField::TechnicalSheet))
                disabled=Signal::derive(locked)
            />
        </div>
    }
}
