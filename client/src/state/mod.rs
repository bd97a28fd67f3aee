//! Reactive application state provided through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` tracks the signed-in client and `ui` the toast/alert layer. Form
//! state (drafts, payment selection, listing query) is page-scoped and lives
//! in the page that owns it.

pub mod auth;
pub mod ui;
