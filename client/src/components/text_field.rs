//! Labeled text input with an inline error.

use leptos::prelude::*;

#[component]
pub fn TextField(
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(into)] value: Signal<String>,
    on_input: Callback<String>,
    #[prop(into, optional)] error: MaybeProp<String>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    view! {
        <label class="form-field" class:form-field--invalid=move || error.get().is_some()>
            <span class="form-field__label">{label}</span>
            <input
                type=input_type
                prop:value=move || value.get()
                disabled=move || disabled.is_some_and(|d| d.get())
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
            <Show when=move || error.get().is_some()>
                <span class="form-field__error">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}
