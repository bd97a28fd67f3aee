//! Wire DTOs for the regulator's REST API.
//!
//! DESIGN
//! ======
//! The backend is external and not versioned with this repo, so decoding is
//! lenient: ids accept strings or numbers, French field names are accepted as
//! aliases, and optional fields default when absent.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number id, got {other}"))),
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// The authenticated client account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "raisonSociale")]
    pub company_name: String,
    #[serde(default, alias = "nomContact")]
    pub contact_name: String,
    #[serde(default, alias = "telephone")]
    pub phone: String,
    #[serde(default, alias = "adresse")]
    pub address: Option<String>,
    #[serde(default)]
    pub niu: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Company + contact fields collected by the registration form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub company_name: String,
    pub niu: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OtpRequest {
    pub email: String,
    pub code: String,
}

/// Generic `{ success, message }` acknowledgement.
///
/// Some endpoints answer with a bare `true` or `false` instead of an object;
/// both shapes decode to the same value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    pub message: Option<String>,
}

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Body {
                #[serde(default = "default_true")]
                success: bool,
                #[serde(default)]
                message: Option<String>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(success) => Self { success, message: None },
            Raw::Body { success, message } => Self { success, message },
        })
    }
}

fn default_true() -> bool {
    true
}

impl Default for Ack {
    fn default() -> Self {
        Self { success: true, message: None }
    }
}

/// Full profile record sent with `PATCH /api/clients/profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            company_name: user.company_name.clone(),
            contact_name: user.contact_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

// =============================================================================
// DOSSIERS
// =============================================================================

/// Processing state of a dossier on the regulator side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DossierStatus {
    #[default]
    Draft,
    Submitted,
    InReview,
    AwaitingPayment,
    Approved,
    Rejected,
    Other(String),
}

impl DossierStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "brouillon" | "draft" => Self::Draft,
            "soumis" | "submitted" => Self::Submitted,
            "en_cours" | "en cours" | "in_review" => Self::InReview,
            "paiement_attendu" | "en_attente_paiement" | "awaiting_payment" => Self::AwaitingPayment,
            "valide" | "validé" | "approved" => Self::Approved,
            "rejete" | "rejeté" | "rejected" => Self::Rejected,
            _ => Self::Other(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "brouillon",
            Self::Submitted => "soumis",
            Self::InReview => "en_cours",
            Self::AwaitingPayment => "paiement_attendu",
            Self::Approved => "valide",
            Self::Rejected => "rejete",
            Self::Other(raw) => raw,
        }
    }

    /// Human label for badges.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::InReview => "In review",
            Self::AwaitingPayment => "Awaiting payment",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn requires_payment(&self) -> bool {
        matches!(self, Self::AwaitingPayment)
    }
}

impl fmt::Display for DossierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DossierStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DossierStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Dashboard counts keyed by raw status string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overview {
    pub counts: BTreeMap<String, u64>,
}

impl Overview {
    #[must_use]
    pub fn count(&self, status: &DossierStatus) -> u64 {
        self.counts
            .iter()
            .filter(|(raw, _)| DossierStatus::parse(raw) == *status)
            .map(|(_, n)| *n)
            .sum()
    }

    /// The server's `total` when it sends one, else the sum across statuses.
    #[must_use]
    pub fn total(&self) -> u64 {
        if let Some(total) = self.counts.get("total") {
            return *total;
        }
        self.counts.values().sum()
    }
}

/// Row in the dossier listing and the recent-dossiers panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, alias = "libelle")]
    pub label: String,
    #[serde(default, alias = "statut")]
    pub status: DossierStatus,
    #[serde(default, alias = "dateCreation")]
    pub created_at: Option<String>,
    #[serde(default, alias = "nombreEquipements")]
    pub equipment_count: Option<u32>,
    #[serde(default, alias = "montant")]
    pub amount_due: Option<u64>,
}

/// One page of `GET /api/dossiers`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierPage {
    #[serde(default, alias = "data", alias = "dossiers")]
    pub items: Vec<DossierSummary>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub total: Option<u64>,
}

fn first_page() -> u32 {
    1
}

/// Equipment as stored by the regulator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "nomEquipement")]
    pub equipment_name: String,
    #[serde(default, alias = "modele")]
    pub model: String,
    #[serde(default, alias = "marque")]
    pub brand: String,
    #[serde(default, alias = "fabricant")]
    pub manufacturer: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "quantiteEquipements")]
    pub quantity: u32,
    #[serde(default, alias = "fiche_technique")]
    pub technical_sheet_url: Option<String>,
}

/// Full dossier record from `GET /api/dossiers/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierDetail {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, alias = "libelle")]
    pub label: String,
    #[serde(default, alias = "statut")]
    pub status: DossierStatus,
    #[serde(default, alias = "dateCreation")]
    pub created_at: Option<String>,
    #[serde(default, alias = "courrier")]
    pub cover_letter_url: Option<String>,
    #[serde(default, alias = "equipements")]
    pub equipment: Vec<EquipmentRecord>,
    #[serde(default, alias = "montant")]
    pub amount_due: Option<u64>,
}

/// Response of `POST /api/dossiers`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedDossier {
    #[serde(deserialize_with = "deserialize_id", alias = "dossierId")]
    pub id: String,
}

// =============================================================================
// PORTAL SETTINGS
// =============================================================================

/// Bank account shown on the deposit and wire-transfer forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_holder: String,
    /// Published account reference the wire form compares against.
    pub account_reference: String,
}

/// Public, environment-driven settings served by the host to the browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSettings {
    pub token_storage_key: String,
    pub bank: BankDetails,
}

pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "portal_token";

impl Default for PortalSettings {
    fn default() -> Self {
        Self { token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_owned(), bank: BankDetails::default() }
    }
}
