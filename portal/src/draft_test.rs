use std::cell::Cell;

use super::*;

struct Confirm {
    answer: bool,
    asked: Cell<u32>,
}

impl Notifier for Confirm {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn confirm(&self, _message: &str) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}

fn named(name: &str) -> EquipmentDraft {
    EquipmentDraft { equipment_name: name.to_owned(), ..EquipmentDraft::default() }
}

#[test]
fn new_store_has_one_empty_draft() {
    let store = DraftStore::new();
    assert_eq!(store.equipment().len(), 1);
    assert_eq!(store.active(), 0);
    assert_eq!(store.active_draft(), &EquipmentDraft::default());
}

#[test]
fn add_equipment_moves_active_to_new_entry() {
    let mut store = DraftStore::new();
    let index = store.add_equipment();
    assert_eq!(index, 1);
    assert_eq!(store.equipment().len(), 2);
    assert_eq!(store.active(), 1);
}

#[test]
fn delete_equipment_at_length_one_is_noop() {
    let mut store = DraftStore::new();
    assert!(!store.delete_equipment());
    assert_eq!(store.equipment().len(), 1);
    assert_eq!(store.active(), 0);
}

#[test]
fn delete_equipment_removes_active_and_steps_back() {
    let mut store = DraftStore::new();
    store.update_equipment(0, named("router"));
    store.add_equipment();
    store.update_equipment(1, named("modem"));
    assert!(store.delete_equipment());
    assert_eq!(store.equipment().len(), 1);
    assert_eq!(store.active(), 0);
    assert_eq!(store.active_draft().equipment_name, "router");
}

#[test]
fn delete_first_entry_keeps_index_in_bounds() {
    let mut store = DraftStore::new();
    store.add_equipment();
    store.select(0);
    assert!(store.delete_equipment());
    assert_eq!(store.active(), 0);
    assert_eq!(store.equipment().len(), 1);
}

#[test]
fn update_equipment_rejects_out_of_range() {
    let mut store = DraftStore::new();
    assert!(!store.update_equipment(3, named("x")));
    assert_eq!(store.equipment()[0], EquipmentDraft::default());
}

#[test]
fn update_equipment_replaces_whole_record() {
    let mut store = DraftStore::new();
    store.update_equipment(0, EquipmentDraft { brand: "Acme".into(), model: "X1".into(), ..EquipmentDraft::default() });
    store.update_equipment(0, named("switch"));
    assert_eq!(store.active_draft().brand, "");
    assert_eq!(store.active_draft().equipment_name, "switch");
}

#[test]
fn set_dossier_replaces_draft() {
    let mut store = DraftStore::new();
    store.set_dossier(DossierDraft { label: "L1".into(), cover_letter: None });
    assert_eq!(store.dossier().label, "L1");
}

#[test]
fn select_ignores_out_of_range() {
    let mut store = DraftStore::new();
    assert!(!store.select(5));
    assert_eq!(store.active(), 0);
}

#[test]
fn add_confirmed_skips_prompt_when_clean() {
    let mut store = DraftStore::new();
    let notifier = Confirm { answer: false, asked: Cell::new(0) };
    assert!(store.add_equipment_confirmed(&EquipmentDraft::default(), &notifier));
    assert_eq!(notifier.asked.get(), 0);
    assert_eq!(store.equipment().len(), 2);
}

#[test]
fn add_confirmed_declined_leaves_list_unchanged() {
    let mut store = DraftStore::new();
    let notifier = Confirm { answer: false, asked: Cell::new(0) };
    assert!(!store.add_equipment_confirmed(&named("unsaved"), &notifier));
    assert_eq!(notifier.asked.get(), 1);
    assert_eq!(store.equipment().len(), 1);
}

#[test]
fn add_confirmed_accepted_appends() {
    let mut store = DraftStore::new();
    let notifier = Confirm { answer: true, asked: Cell::new(0) };
    assert!(store.add_equipment_confirmed(&named("unsaved"), &notifier));
    assert_eq!(store.active(), 1);
}

#[test]
fn retain_except_keeps_failed_entries() {
    let mut store = DraftStore::new();
    store.update_equipment(0, named("a"));
    store.add_equipment();
    store.update_equipment(1, named("b"));
    store.add_equipment();
    store.update_equipment(2, named("c"));
    store.retain_except(&[0, 2]);
    assert_eq!(store.equipment().len(), 1);
    assert_eq!(store.equipment()[0].equipment_name, "b");
    assert_eq!(store.active(), 0);
}

#[test]
fn retain_except_all_resets() {
    let mut store = DraftStore::new();
    store.add_equipment();
    store.retain_except(&[0, 1]);
    assert_eq!(store.equipment(), &[EquipmentDraft::default()]);
    assert_eq!(store.active(), 0);
}

#[test]
fn ids_follow_drafts_through_delete_and_retain() {
    let mut store = DraftStore::new();
    store.add_equipment();
    store.add_equipment();
    let [a, b, c] = <[u64; 3]>::try_from(store.equipment_ids()).expect("three ids");
    assert!(a != b && b != c && a != c);

    store.select(0);
    assert!(store.delete_equipment());
    assert_eq!(store.equipment_ids(), &[b, c]);

    store.retain_except(&[0]);
    assert_eq!(store.equipment_ids(), &[c]);

    store.reset_equipment();
    assert_eq!(store.equipment_ids().len(), 1);
    assert!(![a, b, c].contains(&store.equipment_ids()[0]));
}

#[test]
fn tab_label_falls_back_to_position() {
    assert_eq!(EquipmentDraft::default().tab_label(0), "Equipment 1");
    assert_eq!(named("  Router ").tab_label(3), "Router");
}
