use super::*;

fn pdf(size: u64) -> Attachment {
    let mut file = Attachment::new("sheet.pdf", "application/pdf", Vec::new());
    file.size = size;
    file
}

fn complete() -> EquipmentDraft {
    EquipmentDraft {
        equipment_name: "Router".into(),
        model: "R1".into(),
        brand: "Acme".into(),
        manufacturer: "Acme Ltd".into(),
        kind: "network".into(),
        description: "Edge router".into(),
        quantity: "3".into(),
        technical_sheet: Some(pdf(1024)),
    }
}

#[test]
fn empty_draft_reports_every_field() {
    let report = validate_equipment(&EquipmentDraft::default());
    assert!(!report.is_valid());
    assert_eq!(report.errors.len(), EquipmentField::ALL.len());
    for field in EquipmentField::ALL {
        assert!(report.error(field.key()).is_some(), "missing error for {}", field.key());
    }
    assert!(report.error("quantiteEquipements").is_some());
    assert!(report.error("fiche_technique").is_some());
}

#[test]
fn whitespace_counts_as_empty() {
    let draft = EquipmentDraft { brand: "   ".into(), ..complete() };
    let report = validate_equipment(&draft);
    assert_eq!(report.error("marque"), Some("Brand is required."));
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn complete_draft_is_valid() {
    let report = validate_equipment(&complete());
    assert!(report.is_valid(), "{report:?}");
}

#[test]
fn bad_quantities_are_rejected() {
    for raw in ["0", "-5", "abc", "1.5"] {
        let draft = EquipmentDraft { quantity: raw.into(), ..complete() };
        let report = validate_equipment(&draft);
        assert_eq!(
            report.error("quantiteEquipements"),
            Some("Quantity must be a number greater than 0."),
            "quantity {raw:?}"
        );
    }
}

#[test]
fn sheet_at_limit_is_accepted() {
    let draft = EquipmentDraft { technical_sheet: Some(pdf(MAX_TECHNICAL_SHEET_BYTES)), ..complete() };
    assert!(validate_equipment(&draft).is_valid());
}

#[test]
fn oversized_sheet_is_rejected() {
    let draft = EquipmentDraft { technical_sheet: Some(pdf(MAX_TECHNICAL_SHEET_BYTES + 1)), ..complete() };
    assert_eq!(validate_equipment(&draft).error("fiche_technique"), Some("Technical sheet must not exceed 3 MB."));
}

#[test]
fn non_pdf_sheet_is_rejected() {
    let sheet = Attachment::new("sheet.docx", "application/msword", vec![0; 10]);
    let draft = EquipmentDraft { technical_sheet: Some(sheet), ..complete() };
    assert_eq!(validate_equipment(&draft).error("fiche_technique"), Some("Technical sheet must be a PDF file."));
}

#[test]
fn alert_message_joins_all_errors() {
    let draft = EquipmentDraft { model: String::new(), quantity: "0".into(), ..complete() };
    let message = validate_equipment(&draft).alert_message();
    assert!(message.contains("Model is required."));
    assert!(message.contains("Quantity must be a number greater than 0."));
    assert_eq!(message.lines().count(), 2);
}

#[test]
fn parse_quantity_accepts_whole_numbers() {
    assert_eq!(parse_quantity(" 3 "), Some(3));
    assert_eq!(parse_quantity("3.0"), Some(3));
    assert_eq!(parse_quantity("0"), None);
    assert_eq!(parse_quantity("NaN"), None);
}

#[test]
fn dossier_requires_label_and_pdf_letter() {
    let report = validate_dossier(&DossierDraft::default());
    assert_eq!(report.error("libelle"), Some("Dossier label is required."));
    assert_eq!(report.error("courrier"), Some("Cover letter is required."));

    let ok = DossierDraft { label: "L1".into(), cover_letter: Some(pdf(10)) };
    assert!(validate_dossier(&ok).is_valid());
}

#[test]
fn set_text_writes_the_matching_field() {
    let mut draft = EquipmentDraft::default();
    for field in EquipmentField::ALL {
        field.set_text(&mut draft, format!("v-{}", field.key()));
    }
    assert_eq!(draft.model, "v-modele");
    assert_eq!(draft.quantity, "v-quantiteEquipements");
    assert_eq!(EquipmentField::Kind.text(&draft), Some("v-type"));
    assert_eq!(EquipmentField::TechnicalSheet.text(&draft), None);
    assert!(draft.technical_sheet.is_none());
}
