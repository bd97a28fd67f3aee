use super::*;
use serde_json::json;

#[test]
fn user_accepts_numeric_id_and_french_aliases() {
    let user: User = serde_json::from_value(json!({
        "id": 17,
        "email": "contact@acme.cg",
        "raisonSociale": "Acme SARL",
        "nomContact": "Jean",
        "telephone": "060000000"
    }))
    .unwrap();
    assert_eq!(user.id, "17");
    assert_eq!(user.company_name, "Acme SARL");
    assert_eq!(user.contact_name, "Jean");
    assert_eq!(user.address, None);
}

#[test]
fn user_rejects_boolean_id() {
    let err = serde_json::from_value::<User>(json!({ "id": true, "email": "a@b.c" })).unwrap_err();
    assert!(err.to_string().contains("expected string or number id"));
}

#[test]
fn login_response_reads_access_token_alias() {
    let resp: LoginResponse = serde_json::from_value(json!({ "accessToken": "t-1" })).unwrap();
    assert_eq!(resp.token.as_deref(), Some("t-1"));
    assert!(resp.user.is_none());
}

#[test]
fn register_request_serializes_camel_case_without_empty_address() {
    let req = RegisterRequest {
        company_name: "Acme".into(),
        niu: "M0123".into(),
        contact_name: "Jean".into(),
        email: "a@b.cg".into(),
        phone: "061234567".into(),
        address: None,
        password: "secret123".into(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["companyName"], "Acme");
    assert_eq!(value["contactName"], "Jean");
    assert!(value.get("address").is_none());
}

#[test]
fn ack_defaults_to_success() {
    let ack: Ack = serde_json::from_value(json!({})).unwrap();
    assert!(ack.success);
    let ack: Ack = serde_json::from_value(json!({ "success": false, "message": "no" })).unwrap();
    assert!(!ack.success);
    assert_eq!(ack.message.as_deref(), Some("no"));
}

#[test]
fn ack_accepts_bare_boolean() {
    let ack: Ack = serde_json::from_str("true").unwrap();
    assert_eq!(ack, Ack { success: true, message: None });
    let ack: Ack = serde_json::from_str("false").unwrap();
    assert!(!ack.success);
    assert!(serde_json::from_str::<Ack>(r#""ok""#).is_err());
}

#[test]
fn dossier_status_parses_french_and_english() {
    assert_eq!(DossierStatus::parse("Soumis"), DossierStatus::Submitted);
    assert_eq!(DossierStatus::parse("en_cours"), DossierStatus::InReview);
    assert_eq!(DossierStatus::parse("approved"), DossierStatus::Approved);
    assert_eq!(DossierStatus::parse("archive"), DossierStatus::Other("archive".into()));
}

#[test]
fn dossier_status_serializes_wire_name() {
    assert_eq!(serde_json::to_value(DossierStatus::AwaitingPayment).unwrap(), json!("paiement_attendu"));
    assert_eq!(serde_json::to_value(DossierStatus::Other("x".into())).unwrap(), json!("x"));
}

#[test]
fn overview_counts_by_status_and_total() {
    let overview: Overview = serde_json::from_value(json!({ "soumis": 3, "valide": 2, "rejete": 1 })).unwrap();
    assert_eq!(overview.count(&DossierStatus::Submitted), 3);
    assert_eq!(overview.count(&DossierStatus::InReview), 0);
    assert_eq!(overview.total(), 6);
}

#[test]
fn overview_prefers_server_total() {
    let overview: Overview = serde_json::from_value(json!({ "total": 10, "soumis": 3 })).unwrap();
    assert_eq!(overview.total(), 10);
}

#[test]
fn dossier_page_accepts_data_alias_and_defaults() {
    let page: DossierPage = serde_json::from_value(json!({
        "data": [{ "id": 1, "libelle": "L1", "statut": "soumis" }]
    }))
    .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].label, "L1");
    assert_eq!(page.items[0].status, DossierStatus::Submitted);
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn dossier_detail_reads_equipment_records() {
    let detail: DossierDetail = serde_json::from_value(json!({
        "id": "d-9",
        "libelle": "Routers",
        "statut": "paiement_attendu",
        "montant": 100000,
        "equipements": [{
            "id": 4,
            "nomEquipement": "Router",
            "modele": "R1",
            "marque": "Acme",
            "fabricant": "Acme Ltd",
            "type": "network",
            "description": "edge router",
            "quantiteEquipements": 3
        }]
    }))
    .unwrap();
    assert!(detail.status.requires_payment());
    assert_eq!(detail.amount_due, Some(100_000));
    assert_eq!(detail.equipment[0].kind, "network");
    assert_eq!(detail.equipment[0].quantity, 3);
}

#[test]
fn created_dossier_accepts_dossier_id_alias() {
    let created: CreatedDossier = serde_json::from_value(json!({ "dossierId": 55 })).unwrap();
    assert_eq!(created.id, "55");
}

#[test]
fn portal_settings_default_key() {
    assert_eq!(PortalSettings::default().token_storage_key, DEFAULT_TOKEN_STORAGE_KEY);
}
