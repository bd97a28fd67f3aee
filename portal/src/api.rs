//! The regulator's REST API as seen by the portal.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`PortalApi`] is the seam between workflow code and transport. The browser
//! implements it over `gloo-net`, the CLI over `reqwest`, tests with in-memory
//! doubles. Endpoint paths, multipart layouts and response interpretation
//! live here so every transport agrees on them.
//!
//! ERROR HANDLING
//! ==============
//! A 401 clears the stored token and surfaces as [`ApiError::Unauthorized`]
//! so callers can redirect to login. Other non-2xx responses keep the
//! server's `message` field when it sends one.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::attachment::Attachment;
use crate::draft::{DossierDraft, EquipmentDraft};
use crate::listing::ListQuery;
use crate::payment::PaymentSubmission;
use crate::session::{Session, TokenStore};
use crate::types::{
    Ack, CreatedDossier, DossierDetail, DossierPage, DossierSummary, LoginRequest, LoginResponse, OtpRequest,
    Overview, ProfileUpdate, RegisterRequest, User,
};
use crate::validation::EquipmentField;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const VERIFY_OTP_PATH: &str = "/api/auth/verify-otp";
pub const RESEND_OTP_PATH: &str = "/api/auth/resend-otp";
pub const CURRENT_USER_PATH: &str = "/api/auth/me";
pub const PROFILE_PATH: &str = "/api/clients/profile";
pub const OVERVIEW_PATH: &str = "/api/dossiers/apercu";
pub const RECENT_DOSSIERS_PATH: &str = "/api/dossiers/recents";
pub const DOSSIERS_PATH: &str = "/api/dossiers";

/// Header carrying the client-generated key for equipment posts.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[must_use]
pub fn dossier_endpoint(dossier_id: &str) -> String {
    format!("{DOSSIERS_PATH}/{dossier_id}")
}

#[must_use]
pub fn equipment_endpoint(dossier_id: &str) -> String {
    format!("{DOSSIERS_PATH}/{dossier_id}/equipements")
}

#[must_use]
pub fn payment_endpoint(dossier_id: &str) -> String {
    format!("{DOSSIERS_PATH}/{dossier_id}/paiements")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("session expired, please sign in again")]
    Unauthorized,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Build from a non-2xx status and its raw body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| format!("request failed: {status}"));
        Self::Status { status, message }
    }

    /// Text suitable for an alert: the server's message when it sent one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Unauthorized => self.to_string(),
            Self::Transport(_) | Self::Decode(_) | Self::Unavailable => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Turn a raw response into `T`, updating the session on the way.
///
/// Bodies wrapped as `{ "data": ... }` are unwrapped when the bare body does
/// not decode. An empty 2xx body decodes as `{}`.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] (and clears the token) on 401,
/// [`ApiError::Status`] on other non-2xx codes and [`ApiError::Decode`] when
/// the body does not match `T`.
pub fn interpret_response<T, S>(status: u16, body: &str, session: &Session<S>) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    S: TokenStore,
{
    if status == 401 {
        session.sign_out();
        return Err(ApiError::Unauthorized);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::from_status(status, body));
    }

    let value = if body.trim().is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str::<Value>(body).map_err(|e| ApiError::Decode(e.to_string()))?
    };
    session.absorb(&value);

    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(err) => match value.get("data") {
            Some(inner) => serde_json::from_value::<T>(inner.clone()).map_err(|e| ApiError::Decode(e.to_string())),
            None => Err(ApiError::Decode(err.to_string())),
        },
    }
}

/// One part of a multipart body, independent of the HTTP library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    Text { name: &'static str, value: String },
    File { name: &'static str, file: Attachment },
}

impl Part {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

fn text(name: &'static str, value: &str) -> Part {
    Part::Text { name, value: value.trim().to_owned() }
}

/// `POST /api/dossiers` body: `libelle` + `courrier`.
#[must_use]
pub fn dossier_parts(draft: &DossierDraft) -> Vec<Part> {
    let mut parts = vec![text("libelle", &draft.label)];
    if let Some(file) = &draft.cover_letter {
        parts.push(Part::File { name: "courrier", file: file.clone() });
    }
    parts
}

/// `POST /api/dossiers/{id}/equipements` body, keyed by wire field names.
#[must_use]
pub fn equipment_parts(draft: &EquipmentDraft) -> Vec<Part> {
    let mut parts = vec![
        text(EquipmentField::EquipmentName.key(), &draft.equipment_name),
        text(EquipmentField::Model.key(), &draft.model),
        text(EquipmentField::Brand.key(), &draft.brand),
        text(EquipmentField::Manufacturer.key(), &draft.manufacturer),
        text(EquipmentField::Kind.key(), &draft.kind),
        text(EquipmentField::Description.key(), &draft.description),
        text(EquipmentField::Quantity.key(), &draft.quantity),
    ];
    if let Some(file) = &draft.technical_sheet {
        parts.push(Part::File { name: EquipmentField::TechnicalSheet.key(), file: file.clone() });
    }
    parts
}

/// Payment body: the JSON payload as `paiement`, plus `justificatif` when a
/// receipt or proof of transfer was uploaded.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the payload cannot be serialized.
pub fn payment_parts(payment: &PaymentSubmission) -> Result<Vec<Part>, ApiError> {
    let payload = serde_json::to_string(&payment.payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    let mut parts = vec![Part::Text { name: "paiement", value: payload }];
    if let Some(file) = &payment.proof {
        parts.push(Part::File { name: "justificatif", file: file.clone() });
    }
    Ok(parts)
}

/// Operations the portal consumes from the regulator's API.
///
/// Futures are not required to be `Send`: the browser transport is
/// single-threaded.
#[async_trait::async_trait(?Send)]
pub trait PortalApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<Ack, ApiError>;
    async fn verify_otp(&self, request: &OtpRequest) -> Result<Ack, ApiError>;
    async fn resend_otp(&self, email: &str) -> Result<Ack, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError>;
    async fn overview(&self) -> Result<Overview, ApiError>;
    async fn recent_dossiers(&self) -> Result<Vec<DossierSummary>, ApiError>;
    async fn list_dossiers(&self, query: &ListQuery) -> Result<DossierPage, ApiError>;
    async fn create_dossier(&self, draft: &DossierDraft) -> Result<CreatedDossier, ApiError>;
    async fn add_equipment(
        &self,
        dossier_id: &str,
        draft: &EquipmentDraft,
        idempotency_key: &str,
    ) -> Result<Ack, ApiError>;
    async fn dossier(&self, dossier_id: &str) -> Result<DossierDetail, ApiError>;
    async fn submit_payment(&self, dossier_id: &str, payment: &PaymentSubmission) -> Result<Ack, ApiError>;
}
