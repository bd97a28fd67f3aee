//! `PortalApi` over `reqwest`, with the bearer token kept in a file.
//!
//! The CLI talks to the same `/api/*` paths as the browser, so the base URL
//! is usually the portal host (which proxies to the regulator) but may also
//! point at the regulator's API directly.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::fs;
use std::path::{Path, PathBuf};

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
    Overview, ProfileUpdate, RegisterRequest, User,
};
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part as FormPart};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Token persisted as the whole contents of a file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        (!token.is_empty()).then(|| token.to_owned())
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), %error, "could not create token directory");
                return;
            }
        }
        if let Err(error) = fs::write(&self.path, token) {
            tracing::warn!(path = %self.path.display(), %error, "could not save token");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => tracing::warn!(path = %self.path.display(), %error, "could not remove token"),
        }
    }
}

enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<Part>),
}

pub struct HttpPortalApi {
    http: reqwest::Client,
    base_url: String,
    session: Session<FileTokenStore>,
}

impl HttpPortalApi {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, store: FileTokenStore) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_owned(), session: Session::new(store) }
    }

    #[must_use]
    pub fn session(&self) -> &Session<FileTokenStore> {
        &self.session
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        headers: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(bearer) = self.session.bearer() {
            request = request.header(AUTHORIZATION, bearer);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(parts) => request.multipart(multipart_form(parts)?),
        };

        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(%method, path, status, "api response");
        api::interpret_response(status, &text, &self.session)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, Body::Empty, &[]).await
    }

    async fn json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send(method, path, Body::Json(value), &[]).await
    }
}

/// Convert library-neutral parts into a `reqwest` multipart form.
///
/// # Errors
///
/// Returns [`ApiError::Transport`] when a declared content type is not a
/// valid MIME string.
pub fn multipart_form(parts: Vec<Part>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            Part::Text { name, value } => form.text(name, value),
            Part::File { name, file } => {
                let content_type = file.content_type.clone();
                let part = FormPart::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&content_type)
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl PortalApi for HttpPortalApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.json(Method::POST, LOGIN_PATH, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Ack, ApiError> {
        self.json(Method::POST, REGISTER_PATH, request).await
    }

    async fn verify_otp(&self, request: &OtpRequest) -> Result<Ack, ApiError> {
        self.json(Method::POST, VERIFY_OTP_PATH, request).await
    }

    async fn resend_otp(&self, email: &str) -> Result<Ack, ApiError> {
        self.json(Method::POST, RESEND_OTP_PATH, &serde_json::json!({ "email": email })).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get(CURRENT_USER_PATH).await
    }

    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError> {
        self.json(Method::PATCH, PROFILE_PATH, profile).await
    }

    async fn overview(&self) -> Result<Overview, ApiError> {
        self.get(OVERVIEW_PATH).await
    }

    async fn recent_dossiers(&self) -> Result<Vec<DossierSummary>, ApiError> {
        self.get(RECENT_DOSSIERS_PATH).await
    }

    async fn list_dossiers(&self, query: &ListQuery) -> Result<DossierPage, ApiError> {
        self.get(&format!("{DOSSIERS_PATH}?{}", query.to_query_string())).await
    }

    async fn create_dossier(&self, draft: &DossierDraft) -> Result<CreatedDossier, ApiError> {
        self.send(Method::POST, DOSSIERS_PATH, Body::Multipart(api::dossier_parts(draft)), &[]).await
    }

    async fn add_equipment(
        &self,
        dossier_id: &str,
        draft: &EquipmentDraft,
        idempotency_key: &str,
    ) -> Result<Ack, ApiError> {
        let path = api::equipment_endpoint(dossier_id);
        let headers = [(IDEMPOTENCY_HEADER, idempotency_key)];
        self.send(Method::POST, &path, Body::Multipart(api::equipment_parts(draft)), &headers).await
    }

    async fn dossier(&self, dossier_id: &str) -> Result<DossierDetail, ApiError> {
        self.get(&api::dossier_endpoint(dossier_id)).await
    }

    async fn submit_payment(&self, dossier_id: &str, payment: &PaymentSubmission) -> Result<Ack, ApiError> {
        let path = api::payment_endpoint(dossier_id);
        self.send(Method::POST, &path, Body::Multipart(api::payment_parts(payment)?), &[]).await
    }
}
