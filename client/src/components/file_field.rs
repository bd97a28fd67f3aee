//! Labeled `<input type="file">` that yields an [`Attachment`].

use leptos::prelude::*;
use portal::attachment::Attachment;

use crate::util::files::describe;

#[component]
pub fn FileField(
    label: &'static str,
    #[prop(default = "application/pdf")] accept: &'static str,
    #[prop(into)] file: Signal<Option<Attachment>>,
    on_pick: Callback<Option<Attachment>>,
    #[prop(into, optional)] error: MaybeProp<String>,
    #[prop(optional)] disabled: Option<Signal<bool>>,
) -> impl IntoView {
    let on_change = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast as _;
            let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
                return;
            };
            leptos::task::spawn_local(async move {
                on_pick.run(crate::util::files::read_input_file(&input).await);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (ev, on_pick);
        }
    };

    view! {
        <label class="form-field form-field--file" class:form-field--invalid=move || error.get().is_some()>
            <span class="form-field__label">{label}</span>
            <input
                type="file"
                accept=accept
                disabled=move || disabled.is_some_and(|d| d.get())
                on:change=on_change
            />
            <span class="form-field__hint">
                {move || file.get().map_or_else(|| "No file selected".to_owned(), |f| describe(&f))}
            </span>
            <Show when=move || error.get().is_some()>
                <span class="form-field__error">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}
