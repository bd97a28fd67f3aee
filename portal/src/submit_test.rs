use std::cell::RefCell;
use std::sync::Mutex;

use super::*;
use crate::attachment::Attachment;
use crate::draft::DossierDraft;
use crate::listing::ListQuery;
use crate::payment::PaymentSubmission;
use crate::types::{
    Ack, CreatedDossier, DossierDetail, DossierPage, DossierSummary, LoginRequest, LoginResponse, OtpRequest,
    Overview, ProfileUpdate, RegisterRequest, User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    CreateDossier { label: String },
    AddEquipment { dossier_id: String, name: String, key: String },
}

/// Records calls; equipment named in `failing` is rejected with a 500.
struct MockApi {
    calls: Mutex<Vec<Call>>,
    dossier_id: String,
    fail_create: bool,
    failing: Mutex<Vec<String>>,
}

impl MockApi {
    fn new(dossier_id: &str) -> Self {
        Self { calls: Mutex::new(Vec::new()), dossier_id: dossier_id.into(), fail_create: false, failing: Mutex::new(Vec::new()) }
    }

    fn failing(self, names: &[&str]) -> Self {
        *self.failing.lock().unwrap() = names.iter().map(|n| (*n).to_owned()).collect();
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl PortalApi for MockApi {
    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        unimplemented!()
    }
    async fn register(&self, _request: &RegisterRequest) -> Result<Ack, ApiError> {
        unimplemented!()
    }
    async fn verify_otp(&self, _request: &OtpRequest) -> Result<Ack, ApiError> {
        unimplemented!()
    }
    async fn resend_otp(&self, _email: &str) -> Result<Ack, ApiError> {
        unimplemented!()
    }
    async fn current_user(&self) -> Result<User, ApiError> {
        unimplemented!()
    }
    async fn update_profile(&self, _profile: &ProfileUpdate) -> Result<User, ApiError> {
        unimplemented!()
    }
    async fn overview(&self) -> Result<Overview, ApiError> {
        unimplemented!()
    }
    async fn recent_dossiers(&self) -> Result<Vec<DossierSummary>, ApiError> {
        unimplemented!()
    }
    async fn list_dossiers(&self, _query: &ListQuery) -> Result<DossierPage, ApiError> {
        unimplemented!()
    }
    async fn create_dossier(&self, draft: &DossierDraft) -> Result<CreatedDossier, ApiError> {
        self.calls.lock().unwrap().push(Call::CreateDossier { label: draft.label.clone() });
        if self.fail_create {
            return Err(ApiError::Status { status: 422, message: "label taken".into() });
        }
        Ok(CreatedDossier { id: self.dossier_id.clone() })
    }
    async fn add_equipment(&self, dossier_id: &str, draft: &EquipmentDraft, key: &str) -> Result<Ack, ApiError> {
        self.calls.lock().unwrap().push(Call::AddEquipment {
            dossier_id: dossier_id.into(),
            name: draft.equipment_name.clone(),
            key: key.into(),
        });
        if self.failing.lock().unwrap().contains(&draft.equipment_name) {
            return Err(ApiError::Status { status: 500, message: "boom".into() });
        }
        Ok(Ack::default())
    }
    async fn dossier(&self, _dossier_id: &str) -> Result<DossierDetail, ApiError> {
        unimplemented!()
    }
    async fn submit_payment(&self, _dossier_id: &str, _payment: &PaymentSubmission) -> Result<Ack, ApiError> {
        unimplemented!()
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingNotifier {
    fn kinds(&self) -> Vec<&'static str> {
        self.messages.borrow().iter().map(|(k, _)| *k).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(("success", message.into()));
    }
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(("error", message.into()));
    }
    fn warning(&self, message: &str) {
        self.messages.borrow_mut().push(("warning", message.into()));
    }
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

fn pdf(name: &str) -> Attachment {
    Attachment::new(name, "application/pdf", vec![0; 128])
}

fn equipment(name: &str) -> EquipmentDraft {
    EquipmentDraft {
        equipment_name: name.into(),
        model: "M".into(),
        brand: "B".into(),
        manufacturer: "F".into(),
        kind: "radio".into(),
        description: "d".into(),
        quantity: "3".into(),
        technical_sheet: Some(pdf("sheet.pdf")),
    }
}

fn store_with(names: &[&str]) -> DraftStore {
    let mut store = DraftStore::new();
    store.set_dossier(DossierDraft { label: "L1".into(), cover_letter: Some(pdf("letter.pdf")) });
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            store.add_equipment();
        }
        store.update_equipment(i, equipment(name));
    }
    store
}

#[tokio::test]
async fn submit_creates_dossier_then_posts_each_equipment() {
    let api = MockApi::new("d-1");
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem"]);
    let mut submitter = Submitter::new();

    let report = submitter.submit(&api, &notifier, &mut store).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], Call::CreateDossier { label: "L1".into() });
    for call in &calls[1..] {
        assert!(matches!(call, Call::AddEquipment { dossier_id, .. } if dossier_id == "d-1"));
    }
    assert!(report.is_complete());
    assert_eq!(report.saved, vec![0, 1]);
    assert_eq!(store.equipment(), &[EquipmentDraft::default()]);
    assert_eq!(store.active(), 0);
    assert_eq!(submitter.pending_dossier_id(), None);
    assert_eq!(notifier.kinds(), vec!["success"]);
}

#[tokio::test]
async fn invalid_equipment_blocks_submission() {
    let api = MockApi::new("d-1");
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router"]);
    store.add_equipment();

    let err = Submitter::new().submit(&api, &notifier, &mut store).await.unwrap_err();

    assert!(matches!(err, SubmitError::InvalidEquipment { index: 1, .. }));
    assert!(api.calls().is_empty());
    assert_eq!(notifier.kinds(), vec!["error"]);
    assert_eq!(store.equipment().len(), 2);
}

#[tokio::test]
async fn invalid_dossier_blocks_submission() {
    let api = MockApi::new("d-1");
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router"]);
    store.set_dossier(DossierDraft::default());

    let err = Submitter::new().submit(&api, &notifier, &mut store).await.unwrap_err();

    assert!(matches!(err, SubmitError::InvalidDossier(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn create_failure_posts_no_equipment() {
    let mut api = MockApi::new("d-1");
    api.fail_create = true;
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem"]);

    let err = Submitter::new().submit(&api, &notifier, &mut store).await.unwrap_err();

    assert!(matches!(err, SubmitError::CreateDossier(_)));
    assert_eq!(api.calls().len(), 1);
    assert_eq!(store.equipment().len(), 2);
    assert_eq!(notifier.messages.borrow()[0], ("error", "label taken".to_owned()));
}

#[tokio::test]
async fn partial_failure_keeps_failed_drafts_and_dossier_id() {
    let api = MockApi::new("d-7").failing(&["modem"]);
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem", "antenna"]);
    let mut submitter = Submitter::new();

    let report = submitter.submit(&api, &notifier, &mut store).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.saved, vec![0, 2]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].index, 1);
    assert_eq!(report.summary(), "2 of 3 equipment entries saved; retry the failed 1 (modem).");
    assert_eq!(store.equipment().len(), 1);
    assert_eq!(store.equipment()[0].equipment_name, "modem");
    assert_eq!(submitter.pending_dossier_id(), Some("d-7"));
    assert_eq!(notifier.kinds(), vec!["warning"]);
}

#[tokio::test]
async fn retry_reuses_dossier_and_idempotency_key() {
    let api = MockApi::new("d-7").failing(&["modem"]);
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem"]);
    let mut submitter = Submitter::new();
    submitter.submit(&api, &notifier, &mut store).await.unwrap();

    let first_key = api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::AddEquipment { name, key, .. } if name == "modem" => Some(key),
            _ => None,
        })
        .unwrap();

    api.failing.lock().unwrap().clear();
    let report = submitter.submit(&api, &notifier, &mut store).await.unwrap();

    assert!(report.is_complete());
    let calls = api.calls();
    let creates = calls.iter().filter(|c| matches!(c, Call::CreateDossier { .. })).count();
    assert_eq!(creates, 1);
    assert_eq!(
        calls.last(),
        Some(&Call::AddEquipment { dossier_id: "d-7".into(), name: "modem".into(), key: first_key })
    );
    assert_eq!(store.equipment(), &[EquipmentDraft::default()]);
    assert_eq!(submitter.pending_dossier_id(), None);
}

fn keys_for(calls: &[Call], wanted: &str) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::AddEquipment { name, key, .. } if name == wanted => Some(key.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn retry_keeps_each_drafts_key_after_a_delete() {
    let api = MockApi::new("d-7").failing(&["router", "modem"]);
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem"]);
    let mut submitter = Submitter::new();
    let report = submitter.submit(&api, &notifier, &mut store).await.unwrap();
    assert_eq!(report.failed.len(), 2);

    store.select(0);
    assert!(store.delete_equipment());
    api.failing.lock().unwrap().clear();
    let report = submitter.retry_failed(&api, &notifier, &mut store).await.unwrap();
    assert!(report.is_complete());

    let calls = api.calls();
    let router_keys = keys_for(&calls, "router");
    let modem_keys = keys_for(&calls, "modem");
    assert_eq!(router_keys.len(), 1);
    assert_eq!(modem_keys.len(), 2);
    assert_eq!(modem_keys[0], modem_keys[1]);
    assert_ne!(modem_keys[1], router_keys[0]);
}

#[tokio::test]
async fn rejected_ack_counts_as_failure() {
    struct RejectingApi(MockApi);

    #[async_trait::async_trait(?Send)]
    impl PortalApi for RejectingApi {
        async fn login(&self, r: &LoginRequest) -> Result<LoginResponse, ApiError> {
            self.0.login(r).await
        }
        async fn register(&self, r: &RegisterRequest) -> Result<Ack, ApiError> {
            self.0.register(r).await
        }
        async fn verify_otp(&self, r: &OtpRequest) -> Result<Ack, ApiError> {
            self.0.verify_otp(r).await
        }
        async fn resend_otp(&self, e: &str) -> Result<Ack, ApiError> {
            self.0.resend_otp(e).await
        }
        async fn current_user(&self) -> Result<User, ApiError> {
            self.0.current_user().await
        }
        async fn update_profile(&self, p: &ProfileUpdate) -> Result<User, ApiError> {
            self.0.update_profile(p).await
        }
        async fn overview(&self) -> Result<Overview, ApiError> {
            self.0.overview().await
        }
        async fn recent_dossiers(&self) -> Result<Vec<DossierSummary>, ApiError> {
            self.0.recent_dossiers().await
        }
        async fn list_dossiers(&self, q: &ListQuery) -> Result<DossierPage, ApiError> {
            self.0.list_dossiers(q).await
        }
        async fn create_dossier(&self, d: &DossierDraft) -> Result<CreatedDossier, ApiError> {
            self.0.create_dossier(d).await
        }
        async fn add_equipment(&self, _id: &str, _d: &EquipmentDraft, _k: &str) -> Result<Ack, ApiError> {
            Ok(Ack { success: false, message: Some("duplicate model".into()) })
        }
        async fn dossier(&self, id: &str) -> Result<DossierDetail, ApiError> {
            self.0.dossier(id).await
        }
        async fn submit_payment(&self, id: &str, p: &PaymentSubmission) -> Result<Ack, ApiError> {
            self.0.submit_payment(id, p).await
        }
    }

    let api = RejectingApi(MockApi::new("d-2"));
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router"]);

    let report = Submitter::new().submit(&api, &notifier, &mut store).await.unwrap();

    assert_eq!(report.failed[0].error.user_message(), "duplicate model");
    assert_eq!(store.equipment()[0].equipment_name, "router");
}

#[test]
fn abandon_clears_pending_dossier() {
    let mut submitter = Submitter { dossier_id: Some("d".into()), keys: std::collections::HashMap::from([(0, "k".into())]) };
    submitter.abandon();
    assert_eq!(submitter.pending_dossier_id(), None);
    assert!(submitter.keys.is_empty());
}

#[tokio::test]
async fn retry_failed_requires_a_pending_dossier() {
    let api = MockApi::new("d-9");
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router"]);
    let mut submitter = Submitter::new();

    let err = submitter.retry_failed(&api, &notifier, &mut store).await.unwrap_err();
    assert_eq!(err, SubmitError::NothingToRetry);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn retry_failed_posts_only_leftovers() {
    let api = MockApi::new("d-9").failing(&["modem"]);
    let notifier = RecordingNotifier::default();
    let mut store = store_with(&["router", "modem", "switch"]);
    let mut submitter = Submitter::new();
    submitter.submit(&api, &notifier, &mut store).await.unwrap();

    api.failing.lock().unwrap().clear();
    let before = api.calls().len();
    let report = submitter.retry_failed(&api, &notifier, &mut store).await.unwrap();

    assert_eq!(report.attempted, 1);
    assert_eq!(api.calls().len(), before + 1);
}
