//! In-memory dossier drafts and the equipment list behind the tabbed editor.
//!
//! INVARIANTS
//! ==========
//! - `equipment` never becomes empty; deleting the last entry is a no-op.
//! - `active` always indexes into `equipment` after every mutation.
//! - Every draft carries an id that moves with it through deletes and
//!   retains and is never reused within one store.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use crate::attachment::Attachment;
use crate::notify::Notifier;

/// Dossier-level form: the label and the signed cover letter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DossierDraft {
    pub label: String,
    pub cover_letter: Option<Attachment>,
}

/// One equipment's technical submission, as typed into the editor.
///
/// `quantity` stays a string so partially typed values survive until
/// validation runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquipmentDraft {
    pub equipment_name: String,
    pub model: String,
    pub brand: String,
    pub manufacturer: String,
    pub kind: String,
    pub description: String,
    pub quantity: String,
    pub technical_sheet: Option<Attachment>,
}

impl EquipmentDraft {
    /// Short label used on editor tabs.
    #[must_use]
    pub fn tab_label(&self, index: usize) -> String {
        let name = self.equipment_name.trim();
        if name.is_empty() { format!("Equipment {}", index + 1) } else { name.to_owned() }
    }
}

/// Dossier draft plus the ordered equipment drafts and the active tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftStore {
    dossier: DossierDraft,
    equipment: Vec<EquipmentDraft>,
    /// Parallel to `equipment`.
    ids: Vec<u64>,
    next_id: u64,
    active: usize,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dossier: DossierDraft::default(),
            equipment: vec![EquipmentDraft::default()],
            ids: vec![0],
            next_id: 1,
            active: 0,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[must_use]
    pub fn dossier(&self) -> &DossierDraft {
        &self.dossier
    }

    #[must_use]
    pub fn equipment(&self) -> &[EquipmentDraft] {
        &self.equipment
    }

    /// Stable ids of the drafts, in the same order as [`Self::equipment`].
    #[must_use]
    pub fn equipment_ids(&self) -> &[u64] {
        &self.ids
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_draft(&self) -> &EquipmentDraft {
        &self.equipment[self.active]
    }

    pub fn set_dossier(&mut self, value: DossierDraft) {
        self.dossier = value;
    }

    /// Append an empty draft and make it active. Returns its index.
    pub fn add_equipment(&mut self) -> usize {
        self.equipment.push(EquipmentDraft::default());
        let id = self.fresh_id();
        self.ids.push(id);
        self.active = self.equipment.len() - 1;
        self.active
    }

    /// Like [`Self::add_equipment`], but asks first when `working` differs
    /// from the committed active draft. Returns whether a draft was added.
    pub fn add_equipment_confirmed<N>(&mut self, working: &EquipmentDraft, notifier: &N) -> bool
    where
        N: Notifier + ?Sized,
    {
        if self.has_unsaved_changes(working)
            && !notifier.confirm("The current equipment has unsaved changes that will be lost. Continue?")
        {
            return false;
        }
        self.add_equipment();
        true
    }

    /// Replace the draft at `index`. Returns `false` for an out-of-range index.
    pub fn update_equipment(&mut self, index: usize, value: EquipmentDraft) -> bool {
        match self.equipment.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Remove the active draft when more than one remains.
    pub fn delete_equipment(&mut self) -> bool {
        if self.equipment.len() <= 1 {
            return false;
        }
        self.equipment.remove(self.active);
        self.ids.remove(self.active);
        self.active = self.active.saturating_sub(1);
        true
    }

    /// Switch tabs. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.equipment.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn has_unsaved_changes(&self, working: &EquipmentDraft) -> bool {
        self.active_draft() != working
    }

    /// Back to a single empty equipment draft. The dossier draft is kept.
    pub fn reset_equipment(&mut self) {
        self.equipment = vec![EquipmentDraft::default()];
        self.ids = vec![self.fresh_id()];
        self.active = 0;
    }

    /// Drop the drafts at `indices` (e.g. the ones the server accepted).
    /// Falls back to [`Self::reset_equipment`] when nothing would remain.
    pub fn retain_except(&mut self, indices: &[usize]) {
        let (equipment, ids): (Vec<_>, Vec<_>) = std::mem::take(&mut self.equipment)
            .into_iter()
            .zip(std::mem::take(&mut self.ids))
            .enumerate()
            .filter(|(index, _)| !indices.contains(index))
            .map(|(_, pair)| pair)
            .unzip();
        self.equipment = equipment;
        self.ids = ids;
        if self.equipment.is_empty() {
            self.reset_equipment();
        } else if self.active >= self.equipment.len() {
            self.active = self.equipment.len() - 1;
        }
    }
}
