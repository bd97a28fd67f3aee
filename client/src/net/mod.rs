//! Networking for the browser client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements `portal::PortalApi` over `gloo-net` against the host's
//! `/api` proxy and owns the `localStorage` token store.

pub mod api;
