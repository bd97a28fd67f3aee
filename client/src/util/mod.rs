//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (navigation guards, file inputs)
//! from page and component logic so the logic stays testable off-browser.

pub mod auth;
pub mod files;
pub mod nav;
