//! JSON description of a dossier to submit from the command line.
//!
//! ```json
//! {
//!   "label": "Wi-Fi routers 2026",
//!   "coverLetter": "letter.pdf",
//!   "equipment": [
//!     { "equipmentName": "Router", "model": "AX-3000", "brand": "Netco",
//!       "manufacturer": "Netco Ltd", "type": "router", "description": "...",
//!       "quantity": 12, "technicalSheet": "sheets/ax3000.pdf" }
//!   ]
//! }
//! ```
//!
//! File paths are relative to the manifest's directory.

#[cfg(test)]
#[path = "manifest_test.rs"]
mod manifest_test;

use std::fs;
use std::path::{Path, PathBuf};

use portal::attachment::{Attachment, content_type_for};
use portal::draft::{DossierDraft, DraftStore, EquipmentDraft};
use serde::Deserialize;

use crate::CliError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub label: String,
    #[serde(default)]
    pub cover_letter: Option<PathBuf>,
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEntry {
    #[serde(default)]
    pub equipment_name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub technical_sheet: Option<PathBuf>,
}

/// Quantities may be written as numbers or strings; validation decides.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Quantity {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text,
        }
    }
}

impl Manifest {
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a manifest.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Build the draft store, reading attachments relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Fails when the manifest lists no equipment or an attachment cannot
    /// be read.
    pub fn into_store(self, base_dir: &Path) -> Result<DraftStore, CliError> {
        if self.equipment.is_empty() {
            return Err(CliError::EmptyManifest);
        }

        let cover_letter = self.cover_letter.map(|p| read_attachment(&base_dir.join(p))).transpose()?;
        let mut store = DraftStore::new();
        store.set_dossier(DossierDraft { label: self.label, cover_letter });

        for (position, entry) in self.equipment.into_iter().enumerate() {
            let technical_sheet = entry.technical_sheet.map(|p| read_attachment(&base_dir.join(p))).transpose()?;
            let draft = EquipmentDraft {
                equipment_name: entry.equipment_name,
                model: entry.model,
                brand: entry.brand,
                manufacturer: entry.manufacturer,
                kind: entry.kind,
                description: entry.description,
                quantity: entry.quantity.into_text(),
                technical_sheet,
            };
            let index = if position == 0 { 0 } else { store.add_equipment() };
            store.update_equipment(index, draft);
        }
        Ok(store)
    }
}

/// Read a file into an [`Attachment`], guessing its type from the extension.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be read.
pub fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::Io { path: path.to_owned(), source })?;
    let file_name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let content_type = content_type_for(&file_name);
    Ok(Attachment::new(file_name, content_type, bytes))
}
