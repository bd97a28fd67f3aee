//! # client
//!
//! Leptos + WASM frontend for the homologation client portal.
//!
//! This crate contains pages, components, reactive application state and the
//! browser transport for the regulator's REST API. Domain rules (drafts,
//! validation, payment, submission) come from the `portal` crate; this crate
//! only binds them to the DOM.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
