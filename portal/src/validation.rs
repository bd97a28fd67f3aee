//! Client-side completeness checks run before a draft is accepted.
//!
//! Checks are metadata-only: a file's declared content type and size are
//! trusted as reported; nothing is sniffed or sent over the network.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;

use crate::attachment::{Attachment, MAX_TECHNICAL_SHEET_BYTES};
use crate::draft::{DossierDraft, EquipmentDraft};

/// Equipment form fields, keyed by their wire names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EquipmentField {
    EquipmentName,
    Model,
    Brand,
    Manufacturer,
    Kind,
    Description,
    Quantity,
    TechnicalSheet,
}

impl EquipmentField {
    pub const ALL: [Self; 8] = [
        Self::EquipmentName,
        Self::Model,
        Self::Brand,
        Self::Manufacturer,
        Self::Kind,
        Self::Description,
        Self::Quantity,
        Self::TechnicalSheet,
    ];

    /// Multipart field name expected by the API.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::EquipmentName => "nomEquipement",
            Self::Model => "modele",
            Self::Brand => "marque",
            Self::Manufacturer => "fabricant",
            Self::Kind => "type",
            Self::Description => "description",
            Self::Quantity => "quantiteEquipements",
            Self::TechnicalSheet => "fiche_technique",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::EquipmentName => "Equipment name",
            Self::Model => "Model",
            Self::Brand => "Brand",
            Self::Manufacturer => "Manufacturer",
            Self::Kind => "Type",
            Self::Description => "Description",
            Self::Quantity => "Quantity",
            Self::TechnicalSheet => "Technical sheet",
        }
    }

    /// Current text of a typed field; `None` for the file field.
    #[must_use]
    pub fn text(self, draft: &EquipmentDraft) -> Option<&str> {
        match self {
            Self::EquipmentName => Some(&draft.equipment_name),
            Self::Model => Some(&draft.model),
            Self::Brand => Some(&draft.brand),
            Self::Manufacturer => Some(&draft.manufacturer),
            Self::Kind => Some(&draft.kind),
            Self::Description => Some(&draft.description),
            Self::Quantity => Some(&draft.quantity),
            Self::TechnicalSheet => None,
        }
    }

    /// Overwrite a typed field. The file field is set directly, not here.
    pub fn set_text(self, draft: &mut EquipmentDraft, value: String) {
        let slot = match self {
            Self::EquipmentName => &mut draft.equipment_name,
            Self::Model => &mut draft.model,
            Self::Brand => &mut draft.brand,
            Self::Manufacturer => &mut draft.manufacturer,
            Self::Kind => &mut draft.kind,
            Self::Description => &mut draft.description,
            Self::Quantity => &mut draft.quantity,
            Self::TechnicalSheet => return,
        };
        *slot = value;
    }
}

/// Outcome of a form check: one message per offending field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, key: &'static str, message: impl Into<String>) {
        self.errors.entry(key).or_insert_with(|| message.into());
    }

    /// All messages joined for a single alert.
    #[must_use]
    pub fn alert_message(&self) -> String {
        self.errors.values().cloned().collect::<Vec<_>>().join("\n")
    }
}

/// Check an equipment draft before committing it to the list.
#[must_use]
pub fn validate_equipment(draft: &EquipmentDraft) -> ValidationReport {
    let mut report = ValidationReport::default();

    for field in EquipmentField::ALL {
        if let Some(value) = field.text(draft) {
            if value.trim().is_empty() {
                report.insert(field.key(), format!("{} is required.", field.label()));
            }
        }
    }

    if !draft.quantity.trim().is_empty() && parse_quantity(&draft.quantity).is_none() {
        report.insert(EquipmentField::Quantity.key(), "Quantity must be a number greater than 0.");
    }

    if let Err(message) = check_pdf(draft.technical_sheet.as_ref(), "Technical sheet") {
        report.insert(EquipmentField::TechnicalSheet.key(), message);
    }

    report
}

/// Check the dossier-level form: label and cover letter.
#[must_use]
pub fn validate_dossier(draft: &DossierDraft) -> ValidationReport {
    let mut report = ValidationReport::default();
    if draft.label.trim().is_empty() {
        report.insert("libelle", "Dossier label is required.");
    }
    if let Err(message) = check_pdf(draft.cover_letter.as_ref(), "Cover letter") {
        report.insert("courrier", message);
    }
    report
}

/// Positive quantity, accepting decimal input like `"3"` or `"3.0"`.
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u32)
}

fn check_pdf(file: Option<&Attachment>, what: &str) -> Result<(), String> {
    let Some(file) = file else {
        return Err(format!("{what} is required."));
    };
    if file.exceeds(MAX_TECHNICAL_SHEET_BYTES) {
        return Err(format!("{what} must not exceed 3 MB."));
    }
    if !file.is_pdf() {
        return Err(format!("{what} must be a PDF file."));
    }
    Ok(())
}
