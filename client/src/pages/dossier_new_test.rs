use super::*;

fn named(name: &str) -> EquipmentDraft {
    EquipmentDraft { equipment_name: name.into(), ..EquipmentDraft::default() }
}

#[test]
fn notice_counts_remaining_entries() {
    assert!(pending_notice("d-7", 1).contains("1 equipment entry did not save"));
    assert!(pending_notice("d-7", 3).contains("3 equipment entries did not save"));
    assert!(pending_notice("d-7", 3).starts_with("Dossier d-7 was created"));
}

#[test]
fn captions_fall_back_to_position() {
    let mut store = DraftStore::new();
    store.update_equipment(0, named("Router"));
    store.add_equipment();
    let working = store.active_draft().clone();

    assert_eq!(tab_captions(&store, &working), vec!["Router".to_owned(), "Equipment 2".to_owned()]);
}

#[test]
fn dirty_active_tab_is_marked() {
    let mut store = DraftStore::new();
    store.update_equipment(0, named("Router"));
    let working = named("Router v2");

    assert_eq!(tab_captions(&store, &working), vec!["Router *".to_owned()]);
}

#[test]
fn editor_handlers_do_nothing_while_submitting() {
    let owner = Owner::new();
    owner.with(|| {
        let busy = RwSignal::new(true);
        let store = RwSignal::new(DraftStore::new());
        let on_add = unless_busy(busy, move |()| {
            store.update(|s| {
                s.add_equipment();
            });
        });

        on_add(());
        assert_eq!(store.with_untracked(|s| s.equipment().len()), 1);

        busy.set(false);
        on_add(());
        assert_eq!(store.with_untracked(|s| s.equipment().len()), 2);
    });
}
