//! REST API client for the browser.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, multipart bodies via
//! `FormData`, and the bearer token in `localStorage`.
//! Server-side (SSR): every call returns [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Responses go through `portal::api::interpret_response`, which is also
//! where tokens are absorbed and cleared. Callers get `Result`s and decide
//! how to surface them.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use portal::api::{
    self, ApiError, CURRENT_USER_PATH, DOSSIERS_PATH, IDEMPOTENCY_HEADER, LOGIN_PATH, OVERVIEW_PATH, PROFILE_PATH,
    Part, PortalApi, RECENT_DOSSIERS_PATH, REGISTER_PATH, RESEND_OTP_PATH, VERIFY_OTP_PATH,
};
use portal::draft::{DossierDraft, EquipmentDraft};
use portal::listing::ListQuery;
use portal::payment::PaymentSubmission;
use portal::session::{Session, TokenStore};
use portal::types::{
    Ack, CreatedDossier, DossierDetail, DossierPage, DossierSummary, LoginRequest, LoginResponse, OtpRequest,
    Overview, PortalSettings, ProfileUpdate, RegisterRequest, User,
};
use serde::de::DeserializeOwned;

pub const SETTINGS_PATH: &str = "/portal/config.json";

/// Bearer token persisted under a configurable `localStorage` key.
#[derive(Clone, Debug)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl LocalStorageTokenStore {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self { key: key.to_owned() }
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Log a failed storage write. Quota and privacy-mode failures leave the
/// session working in memory only. Returns whether the write succeeded.
fn storage_write_ok<E: std::fmt::Debug>(action: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            #[cfg(feature = "hydrate")]
            log::warn!("could not {action} token in localStorage: {err:?}");
            #[cfg(not(feature = "hydrate"))]
            let _ = (action, err);
            false
        }
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(&self.key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        if let Some(storage) = local_storage() {
            storage_write_ok("save", storage.set_item(&self.key, token));
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = token;
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        if let Some(storage) = local_storage() {
            storage_write_ok("clear", storage.remove_item(&self.key));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Patch,
}

enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<Part>),
}

/// `PortalApi` over the same-origin `/api` proxy.
pub struct BrowserApi {
    session: Session<LocalStorageTokenStore>,
}

impl BrowserApi {
    #[must_use]
    pub fn new(settings: &PortalSettings) -> Self {
        Self { session: Session::new(LocalStorageTokenStore::new(&settings.token_storage_key)) }
    }

    /// Client for the settings currently held in `settings`.
    #[must_use]
    pub fn from_signal(settings: leptos::prelude::RwSignal<PortalSettings>) -> Self {
        use leptos::prelude::GetUntracked as _;
        Self::new(&settings.get_untracked())
    }

    #[must_use]
    pub fn session(&self) -> &Session<LocalStorageTokenStore> {
        &self.session
    }

    async fn send<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path: &str,
        body: Body,
        headers: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use gloo_net::http::{Method, RequestBuilder};

            let method = match verb {
                Verb::Get => Method::GET,
                Verb::Post => Method::POST,
                Verb::Patch => Method::PATCH,
            };
            let mut builder = RequestBuilder::new(path).method(method);
            if let Some(bearer) = self.session.bearer() {
                builder = builder.header("Authorization", &bearer);
            }
            for (name, value) in headers {
                builder = builder.header(name, value);
            }
            let request = match body {
                Body::Empty => builder.build(),
                Body::Json(value) => builder.json(&value),
                Body::Multipart(parts) => builder.body(form_data(&parts)?),
            }
            .map_err(|e| ApiError::Transport(e.to_string()))?;

            let resp = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = resp.status();
            let text = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            if !resp.ok() {
                log::warn!("{verb:?} {path} -> {status}");
            }
            api::interpret_response(status, &text, &self.session)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (verb, path, body, headers);
            Err(ApiError::Unavailable)
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Verb::Get, path, Body::Empty, &[]).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(Verb::Post, path, Body::Json(value), &[]).await
    }
}

#[cfg(feature = "hydrate")]
fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(format!("{err:?}"))
}

#[cfg(feature = "hydrate")]
fn form_data(parts: &[Part]) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    for part in parts {
        match part {
            Part::Text { name, value } => form.append_with_str(name, value).map_err(js_error)?,
            Part::File { name, file } => {
                let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
                let sequence = js_sys::Array::new();
                sequence.push(&bytes);
                let options = web_sys::BlobPropertyBag::new();
                options.set_type(&file.content_type);
                let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&sequence, &options)
                    .map_err(js_error)?;
                form.append_with_blob_and_filename(name, &blob, &file.file_name).map_err(js_error)?;
            }
        }
    }
    Ok(form)
}

fn list_path(query: &ListQuery) -> String {
    format!("{DOSSIERS_PATH}?{}", query.to_query_string())
}

#[async_trait::async_trait(?Send)]
impl PortalApi for BrowserApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json(LOGIN_PATH, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Ack, ApiError> {
        self.post_json(REGISTER_PATH, request).await
    }

    async fn verify_otp(&self, request: &OtpRequest) -> Result<Ack, ApiError> {
        self.post_json(VERIFY_OTP_PATH, request).await
    }

    async fn resend_otp(&self, email: &str) -> Result<Ack, ApiError> {
        self.post_json(RESEND_OTP_PATH, &serde_json::json!({ "email": email })).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get(CURRENT_USER_PATH).await
    }

    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError> {
        let value = serde_json::to_value(profile).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(Verb::Patch, PROFILE_PATH, Body::Json(value), &[]).await
    }

    async fn overview(&self) -> Result<Overview, ApiError> {
        self.get(OVERVIEW_PATH).await
    }

    async fn recent_dossiers(&self) -> Result<Vec<DossierSummary>, ApiError> {
        self.get(RECENT_DOSSIERS_PATH).await
    }

    async fn list_dossiers(&self, query: &ListQuery) -> Result<DossierPage, ApiError> {
        self.get(&list_path(query)).await
    }

    async fn create_dossier(&self, draft: &DossierDraft) -> Result<CreatedDossier, ApiError> {
        self.send(Verb::Post, DOSSIERS_PATH, Body::Multipart(api::dossier_parts(draft)), &[]).await
    }

    async fn add_equipment(
        &self,
        dossier_id: &str,
        draft: &EquipmentDraft,
        idempotency_key: &str,
    ) -> Result<Ack, ApiError> {
        let path = api::equipment_endpoint(dossier_id);
        let headers = [(IDEMPOTENCY_HEADER, idempotency_key)];
        self.send(Verb::Post, &path, Body::Multipart(api::equipment_parts(draft)), &headers).await
    }

    async fn dossier(&self, dossier_id: &str) -> Result<DossierDetail, ApiError> {
        self.get(&api::dossier_endpoint(dossier_id)).await
    }

    async fn submit_payment(&self, dossier_id: &str, payment: &PaymentSubmission) -> Result<Ack, ApiError> {
        let path = api::payment_endpoint(dossier_id);
        self.send(Verb::Post, &path, Body::Multipart(api::payment_parts(payment)?), &[]).await
    }
}

/// Fetch the host's public settings from `/portal/config.json`.
/// Returns `None` on the server or when the host does not answer.
pub async fn fetch_settings() -> Option<PortalSettings> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(SETTINGS_PATH).send().await.ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<PortalSettings>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Load the signed-in user when a token is stored; `None` otherwise.
pub async fn restore_user(settings: &PortalSettings) -> Option<User> {
    let client = BrowserApi::new(settings);
    if !client.session().is_authenticated() {
        return None;
    }
    client.current_user().await.ok()
}
