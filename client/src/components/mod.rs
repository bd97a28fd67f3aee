//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render portal chrome and form surfaces while reading/writing
//! shared state from Leptos context providers. Workflow rules live in the
//! `portal` crate; components only bind them to inputs.

pub mod authed_page;
pub mod dossier_table;
pub mod equipment_form;
pub mod file_field;
pub mod nav_bar;
pub mod notifications;
pub mod payment_selector;
pub mod status_badge;
pub mod text_field;
