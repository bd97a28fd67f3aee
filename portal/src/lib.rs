//! Shared domain model for the homologation client portal.
//!
//! This crate owns everything that is independent of where the portal runs:
//! wire DTOs for the regulator API, the in-memory dossier drafts, client-side
//! validation, the payment selector, the session/token boundary and the
//! submission orchestrator. Both the Leptos `client` and the `cli` build on it.

pub mod api;
pub mod attachment;
pub mod auth;
pub mod draft;
pub mod listing;
pub mod notify;
pub mod payment;
pub mod session;
pub mod submit;
pub mod types;
pub mod validation;

pub use api::{ApiError, PortalApi};
pub use attachment::Attachment;
pub use draft::{DossierDraft, DraftStore, EquipmentDraft};
pub use notify::Notifier;
pub use session::{Session, TokenStore};
pub use submit::{SubmissionReport, Submitter};
