use super::*;
use crate::session::MemoryTokenStore;
use crate::types::DossierSummary;

#[test]
fn endpoints_format_expected_paths() {
    assert_eq!(dossier_endpoint("42"), "/api/dossiers/42");
    assert_eq!(equipment_endpoint("42"), "/api/dossiers/42/equipements");
    assert_eq!(payment_endpoint("42"), "/api/dossiers/42/paiements");
}

#[test]
fn from_status_keeps_server_message() {
    let err = ApiError::from_status(422, r#"{"message":"Libellé déjà utilisé"}"#);
    assert_eq!(err, ApiError::Status { status: 422, message: "Libellé déjà utilisé".into() });
    assert_eq!(err.user_message(), "Libellé déjà utilisé");
}

#[test]
fn from_status_falls_back_to_code() {
    let err = ApiError::from_status(500, "<html>oops</html>");
    assert_eq!(err.user_message(), "request failed: 500");
}

#[test]
fn from_status_maps_401() {
    assert!(ApiError::from_status(401, "").is_unauthorized());
}

#[test]
fn transport_errors_get_generic_message() {
    let err = ApiError::Transport("dns".into());
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[test]
fn interpret_response_absorbs_token() {
    let session = Session::new(MemoryTokenStore::default());
    let resp: LoginResponse =
        interpret_response(200, r#"{"token":"t-9","user":{"id":1,"email":"a@b.cg"}}"#, &session).unwrap();
    assert_eq!(resp.user.unwrap().id, "1");
    assert_eq!(session.token().as_deref(), Some("t-9"));
}

#[test]
fn interpret_response_401_clears_token() {
    let session = Session::new(MemoryTokenStore::with_token("stale"));
    let result: Result<User, _> = interpret_response(401, "", &session);
    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(!session.is_authenticated());
}

#[test]
fn interpret_response_unwraps_data_envelope() {
    let session = Session::new(MemoryTokenStore::default());
    let items: Vec<DossierSummary> =
        interpret_response(200, r#"{"data":[{"id":"d1","libelle":"L1"}]}"#, &session).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "L1");
}

#[test]
fn interpret_response_empty_body_is_ack() {
    let session = Session::new(MemoryTokenStore::default());
    let ack: Ack = interpret_response(204, "", &session).unwrap();
    assert!(ack.success);
}

#[test]
fn interpret_response_decodes_boolean_ack() {
    let session = Session::new(MemoryTokenStore::default());
    let ack: Ack = interpret_response(200, "true", &session).unwrap();
    assert!(ack.success);
    let ack: Ack = interpret_response(200, "false", &session).unwrap();
    assert!(!ack.success);
}

#[test]
fn interpret_response_reports_decode_errors() {
    let session = Session::new(MemoryTokenStore::default());
    let result: Result<User, _> = interpret_response(200, "not json", &session);
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[test]
fn equipment_parts_use_wire_names() {
    let draft = EquipmentDraft {
        equipment_name: " Router ".into(),
        quantity: "2".into(),
        technical_sheet: Some(Attachment::new("s.pdf", "application/pdf", vec![1])),
        ..EquipmentDraft::default()
    };
    let parts = equipment_parts(&draft);
    let names: Vec<_> = parts.iter().map(Part::name).collect();
    assert_eq!(
        names,
        ["nomEquipement", "modele", "marque", "fabricant", "type", "description", "quantiteEquipements", "fiche_technique"]
    );
    assert_eq!(parts[0], Part::Text { name: "nomEquipement", value: "Router".into() });
}

#[test]
fn equipment_parts_skip_missing_sheet() {
    let parts = equipment_parts(&EquipmentDraft::default());
    assert!(parts.iter().all(|p| matches!(p, Part::Text { .. })));
}

#[test]
fn dossier_parts_include_cover_letter() {
    let draft = DossierDraft {
        label: "L1".into(),
        cover_letter: Some(Attachment::new("letter.pdf", "application/pdf", vec![1])),
    };
    let parts = dossier_parts(&draft);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[1].name(), "courrier");
}
