use portal::types::BankDetails;

use super::*;
use crate::config::PortalConfig;

fn state() -> AppState {
    AppState::new(PortalConfig {
        port: 3000,
        api_base_url: "https://api.homologation.test".into(),
        token_storage_key: "portal_token".into(),
        bank: BankDetails {
            bank_name: "BGFI Bank".into(),
            account_holder: "Autorité de régulation".into(),
            account_reference: "CG3930011000".into(),
        },
        proxy_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn config_exposes_only_public_settings() {
    let Json(settings) = portal_config(State(state())).await;
    assert_eq!(settings.token_storage_key, "portal_token");
    assert_eq!(settings.bank.account_reference, "CG3930011000");

    let json = serde_json::to_value(&settings).unwrap();
    assert!(json.get("api_base_url").is_none());
}
