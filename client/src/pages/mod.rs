//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Authenticated pages render inside `AuthedPage`.

pub mod dashboard;
pub mod dossier_detail;
pub mod dossier_new;
pub mod dossiers;
pub mod login;
pub mod payment;
pub mod profile;
pub mod register;
pub mod verify;
